//! Domain layer containing business entities and contracts.
//!
//! Independent of HTTP, SMTP and storage concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Lead and outbound email data structures
//! - [`delivery`] - Delivery outcomes, failure taxonomy and probe reports
//! - [`repositories`] - Lead log storage contract
//! - [`transport`] - Mail transport contract
//! - [`validation`] - Required-field validation
//!
//! # Lead Flow
//!
//! 1. HTTP handler receives a [`entities::LeadSubmission`]
//! 2. [`validation::validate_submission`] checks the required fields
//! 3. [`repositories::LeadRepository::append`] records the [`entities::Lead`]
//! 4. The notifier walks its [`transport::MailTransport`] chain and returns a
//!    [`delivery::DeliveryResult`]

pub mod delivery;
pub mod entities;
pub mod repositories;
pub mod transport;
pub mod validation;

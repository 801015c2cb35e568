//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations: it validates submissions,
//! records them through the [`LeadRepository`](crate::domain::repositories::LeadRepository)
//! trait and drives delivery through the
//! [`MailTransport`](crate::domain::transport::MailTransport) chain.
//!
//! # Available Services
//!
//! - [`services::lead_service::LeadService`] - Submission intake (validate, record, notify)
//! - [`services::notification_service::NotificationService`] - Fallback chain and transport verification
//! - [`services::status_service::StatusService`] - Health reporting
//!
//! Email bodies are rendered by [`messages::MessageComposer`].

pub mod messages;
pub mod services;

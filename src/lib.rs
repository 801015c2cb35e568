//! # Tire Lead API
//!
//! An HTTP lead-intake service for tire searches built with Axum. Each
//! submission is validated, recorded in a bounded in-memory log and emailed
//! to a fixed recipient through a fallback chain of mail transports.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Leads, delivery outcomes, repository and transport traits
//! - **Application Layer** ([`application`]) - Intake, notification and status services
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory lead log, SMTP and HTTP API transports
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Leads are never lost to a delivery failure: recording always happens first
//! - SMTP (STARTTLS with an implicit-TLS alternate) and Resend-compatible API transports
//! - Startup transport verification and live health probes
//! - Rate limiting, CORS and structured logging
//!
//! ## Quick Start
//!
//! ```bash
//! export SMTP_USER="leads@example.com"
//! export SMTP_PASS="app-password"      # or RESEND_API_KEY="re_..."
//! export LEAD_RECIPIENT="owner@example.com"
//!
//! cargo run
//! ```
//!
//! Without any mail credentials the service still starts and records leads.
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::messages::MessageComposer;
    pub use crate::application::services::{
        LeadService, NotificationService, StatusService,
    };
    pub use crate::domain::delivery::{
        DeliveryFailure, DeliveryResult, FailureKind, TransportInfo, TransportKind,
    };
    pub use crate::domain::entities::{Lead, LeadId, LeadSubmission, OutboundEmail, Sender};
    pub use crate::domain::transport::MailTransport;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::InMemoryLeadRepository;
    pub use crate::state::AppState;
}

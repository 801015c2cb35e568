//! Business logic services for the application layer.

pub mod lead_service;
pub mod notification_service;
pub mod status_service;

pub use lead_service::{LeadReceipt, LeadService};
pub use notification_service::NotificationService;
pub use status_service::{SmtpStatus, StatusReport, StatusService};

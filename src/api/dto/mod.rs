//! Data Transfer Objects for API responses.
//!
//! All DTOs serialize with camelCase keys to match the web form client.
//! Lead submissions are deserialized directly into
//! [`LeadSubmission`](crate::domain::entities::LeadSubmission).

pub mod health;
pub mod lead;
pub mod service_info;
pub mod test_email;

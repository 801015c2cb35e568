//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod leads;
pub mod not_found;
pub mod root;
pub mod send_lead;
pub mod test_email;

pub use health::health_handler;
pub use leads::leads_handler;
pub use not_found::not_found_handler;
pub use root::root_handler;
pub use send_lead::send_lead_handler;
pub use test_email::test_email_handler;

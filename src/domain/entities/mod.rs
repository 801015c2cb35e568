//! Core domain entities representing the lead intake data model.
//!
//! Entities are plain data structures without I/O.
//!
//! # Entity Types
//!
//! - [`LeadSubmission`] - The form payload as received
//! - [`Lead`] - A recorded submission with identifier and receipt time
//! - [`OutboundEmail`] - A rendered notification ready for a transport

pub mod email;
pub mod lead;

pub use email::{OutboundEmail, Sender};
pub use lead::{Lead, LeadId, LeadSubmission};

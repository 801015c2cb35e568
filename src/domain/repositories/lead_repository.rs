//! Repository trait for the recorded lead log.

use crate::domain::entities::{Lead, LeadSubmission};

/// Storage for recorded leads.
///
/// The log is bounded: once `capacity()` is reached, appending evicts the
/// oldest entry. Appending never fails, so a submission accepted by the
/// validator is always retained even when every notification attempt fails.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryLeadRepository`] - capped in-memory log
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait LeadRepository: Send + Sync {
    /// Assigns an identifier and receipt time, appends the lead and trims the
    /// log to capacity.
    fn append(&self, submission: LeadSubmission) -> Lead;

    /// Returns up to `limit` of the newest leads, most recent first.
    fn recent(&self, limit: usize) -> Vec<Lead>;

    /// Number of leads currently held.
    fn count(&self) -> usize;

    /// Maximum number of leads retained.
    fn capacity(&self) -> usize;
}

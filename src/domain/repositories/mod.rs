//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.

pub mod lead_repository;

pub use lead_repository::LeadRepository;

#[cfg(test)]
pub use lead_repository::MockLeadRepository;

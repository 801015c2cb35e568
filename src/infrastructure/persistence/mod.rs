//! Lead storage implementations.
//!
//! # Repositories
//!
//! - [`InMemoryLeadRepository`] - Bounded, process-local lead log

pub mod memory_lead_repository;

pub use memory_lead_repository::InMemoryLeadRepository;

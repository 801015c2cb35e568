//! Infrastructure layer for external integrations.
//!
//! Implements the contracts defined by the domain layer.
//!
//! # Modules
//!
//! - [`mail`] - SMTP and HTTP API mail transports
//! - [`persistence`] - Bounded in-memory lead log

pub mod mail;
pub mod persistence;

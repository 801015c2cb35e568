//! Outbound mail transports.
//!
//! Provides two [`MailTransport`] implementations:
//! - [`SmtpTransport`] - SMTP relay (direct or Gmail) via lettre
//! - [`ApiTransport`] - Resend-compatible HTTP API via reqwest
//!
//! [`build_chain`] turns the configured [`MailTransportConfig`] list into the
//! notifier's fallback chain.

mod api_transport;
mod settings;
mod smtp_transport;

pub use api_transport::ApiTransport;
pub use settings::{ApiSettings, MailTransportConfig, SmtpSettings, TlsMode};
pub use smtp_transport::SmtpTransport;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::transport::MailTransport;

/// Errors raised while constructing a transport.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP transport error: {0}")]
    Smtp(String),

    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Builds a single transport from its configuration.
///
/// # Errors
///
/// Returns [`MailError`] if the underlying client cannot be constructed.
pub fn build_transport(config: &MailTransportConfig) -> Result<Arc<dyn MailTransport>, MailError> {
    match config {
        MailTransportConfig::Smtp(settings) => Ok(Arc::new(SmtpTransport::new(settings.clone())?)),
        MailTransportConfig::Api(settings) => Ok(Arc::new(ApiTransport::new(settings.clone())?)),
    }
}

/// Builds the fallback chain, preserving order.
///
/// Entries that fail to build are logged and skipped so a single bad
/// configuration does not take the other transports down with it.
pub fn build_chain(configs: &[MailTransportConfig]) -> Vec<Arc<dyn MailTransport>> {
    configs
        .iter()
        .filter_map(|config| match build_transport(config) {
            Ok(transport) => {
                info!(transport = config.name(), endpoint = %config.describe(), "Mail transport ready");
                Some(transport)
            }
            Err(e) => {
                warn!(transport = config.name(), error = %e, "Skipping mail transport");
                None
            }
        })
        .collect()
}

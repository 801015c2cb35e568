//! Mail transport trait.

use crate::domain::delivery::{DeliveryFailure, TransportInfo};
use crate::domain::entities::OutboundEmail;
use async_trait::async_trait;

/// A mechanism for sending outbound email.
///
/// Transports are interchangeable links in the notifier's fallback chain.
/// Every error is returned as a classified [`DeliveryFailure`]; a transport
/// never panics on provider errors and bounds each call with its own
/// timeouts.
///
/// # Implementations
///
/// - [`crate::infrastructure::mail::SmtpTransport`] - SMTP relay via lettre
/// - [`crate::infrastructure::mail::ApiTransport`] - Resend-compatible HTTP API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Name and kind used in logs and status reports.
    fn info(&self) -> TransportInfo;

    /// Sends a message and returns the provider's message identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryFailure`] classified as unreachable, auth-rejected,
    /// provider-rejected or message-invalid.
    async fn send(&self, email: &OutboundEmail) -> Result<String, DeliveryFailure>;

    /// Checks that the provider can be reached without sending anything.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryFailure`] describing why the provider is not usable.
    async fn verify(&self) -> Result<(), DeliveryFailure>;
}

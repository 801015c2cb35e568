//! Delivery outcomes reported by the notifier.
//!
//! A delivery never fails the request that triggered it. Instead every
//! attempt is classified into a [`FailureKind`] and surfaced through
//! [`DeliveryResult`], so callers can report what happened while the lead
//! itself stays recorded.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Classification of a failed delivery or probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Timeout, refused connection, TLS or DNS failure.
    TransportUnreachable,
    /// Credentials or API key refused by the provider.
    AuthRejected,
    /// Provider accepted the connection but refused the message
    /// (malformed recipient, quota exceeded, invalid request).
    ProviderRejected,
    /// No transport is configured.
    NotConfigured,
    /// The message could not be built from the configured addresses.
    MessageInvalid,
    /// The notification task ended abnormally.
    Internal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransportUnreachable => "transport-unreachable",
            Self::AuthRejected => "auth-rejected",
            Self::ProviderRejected => "provider-rejected",
            Self::NotConfigured => "not-configured",
            Self::MessageInvalid => "message-invalid",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified delivery failure with operator-facing detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{kind}: {message}")]
pub struct DeliveryFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl DeliveryFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::TransportUnreachable, message)
    }

    pub fn auth_rejected(message: impl Into<String>) -> Self {
        Self::new(FailureKind::AuthRejected, message)
    }

    pub fn provider_rejected(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ProviderRejected, message)
    }

    pub fn not_configured() -> Self {
        Self::new(
            FailureKind::NotConfigured,
            "No mail transport is configured (set SMTP_USER/SMTP_PASS or RESEND_API_KEY)",
        )
    }

    pub fn message_invalid(message: impl Into<String>) -> Self {
        Self::new(FailureKind::MessageInvalid, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Internal, message)
    }
}

/// Which family of provider a transport talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Smtp,
    Api,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smtp => f.write_str("smtp"),
            Self::Api => f.write_str("api"),
        }
    }
}

/// Identity of a transport in the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportInfo {
    pub name: String,
    pub kind: TransportKind,
}

impl TransportInfo {
    pub fn new(name: impl Into<String>, kind: TransportKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for TransportInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// One transport that was tried and failed during a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAttempt {
    pub transport: TransportInfo,
    pub failure: DeliveryFailure,
}

/// Outcome status as reported to HTTP callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStatus {
    Sent,
    FailedButRecorded,
}

/// Result of one synchronous pass over the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// A transport accepted the message. Earlier transports that failed are
    /// listed in `failed_attempts`.
    Sent {
        transport: TransportInfo,
        message_id: String,
        failed_attempts: Vec<FailedAttempt>,
    },
    /// No transport accepted the message. `failure` is the last failure seen,
    /// or [`FailureKind::NotConfigured`] when the chain is empty.
    Failed {
        failure: DeliveryFailure,
        failed_attempts: Vec<FailedAttempt>,
    },
}

impl DeliveryResult {
    pub fn failed(failure: DeliveryFailure, failed_attempts: Vec<FailedAttempt>) -> Self {
        Self::Failed {
            failure,
            failed_attempts,
        }
    }

    pub fn status(&self) -> DeliveryStatus {
        match self {
            Self::Sent { .. } => DeliveryStatus::Sent,
            Self::Failed { .. } => DeliveryStatus::FailedButRecorded,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn failure(&self) -> Option<&DeliveryFailure> {
        match self {
            Self::Sent { .. } => None,
            Self::Failed { failure, .. } => Some(failure),
        }
    }

    pub fn failed_attempts(&self) -> &[FailedAttempt] {
        match self {
            Self::Sent {
                failed_attempts, ..
            }
            | Self::Failed {
                failed_attempts, ..
            } => failed_attempts,
        }
    }
}

/// Connectivity probe result for one transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub transport: TransportInfo,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DeliveryFailure>,
}

impl ProbeResult {
    pub fn from_outcome(transport: TransportInfo, outcome: Result<(), DeliveryFailure>) -> Self {
        match outcome {
            Ok(()) => Self {
                transport,
                reachable: true,
                error: None,
            },
            Err(failure) => Self {
                transport,
                reachable: false,
                error: Some(failure),
            },
        }
    }
}

/// Outcome of the startup verification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub checked_at: DateTime<Utc>,
    /// Transport selected as active, `None` when nothing was reachable.
    pub active: Option<TransportInfo>,
    pub probes: Vec<ProbeResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp() -> TransportInfo {
        TransportInfo::new("smtp-primary", TransportKind::Smtp)
    }

    #[test]
    fn test_failure_display_includes_kind() {
        let failure = DeliveryFailure::auth_rejected("535 bad credentials");
        assert_eq!(failure.to_string(), "auth-rejected: 535 bad credentials");
    }

    #[test]
    fn test_failure_kind_serializes_kebab_case() {
        let value = serde_json::to_value(FailureKind::TransportUnreachable).unwrap();
        assert_eq!(value, "transport-unreachable");
        assert_eq!(
            serde_json::to_value(DeliveryStatus::FailedButRecorded).unwrap(),
            "failed-but-recorded"
        );
    }

    #[test]
    fn test_sent_result_accessors() {
        let result = DeliveryResult::Sent {
            transport: smtp(),
            message_id: "<abc@example.com>".to_string(),
            failed_attempts: vec![],
        };

        assert!(result.is_sent());
        assert_eq!(result.status(), DeliveryStatus::Sent);
        assert!(result.failure().is_none());
        assert!(result.failed_attempts().is_empty());
    }

    #[test]
    fn test_failed_result_accessors() {
        let attempt = FailedAttempt {
            transport: smtp(),
            failure: DeliveryFailure::unreachable("connection refused"),
        };
        let result = DeliveryResult::failed(attempt.failure.clone(), vec![attempt]);

        assert!(!result.is_sent());
        assert_eq!(result.status(), DeliveryStatus::FailedButRecorded);
        assert_eq!(
            result.failure().map(|f| f.kind),
            Some(FailureKind::TransportUnreachable)
        );
        assert_eq!(result.failed_attempts().len(), 1);
    }

    #[test]
    fn test_probe_result_from_outcome() {
        let ok = ProbeResult::from_outcome(smtp(), Ok(()));
        assert!(ok.reachable);
        assert!(ok.error.is_none());

        let err = ProbeResult::from_outcome(smtp(), Err(DeliveryFailure::unreachable("timeout")));
        assert!(!err.reachable);
        assert_eq!(err.error.unwrap().kind, FailureKind::TransportUnreachable);
    }
}

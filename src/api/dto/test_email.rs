//! DTOs for the diagnostic email endpoint.

use serde::Serialize;

use crate::api::dto::lead::MessageIds;
use crate::domain::delivery::{FailedAttempt, FailureKind, TransportInfo};

/// Diagnostic message accepted by a transport.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(flatten)]
    pub ids: MessageIds,
    pub transport: TransportInfo,
}

/// Diagnostic message rejected by every transport.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailFailure {
    pub success: bool,
    pub error: String,
    pub kind: FailureKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_attempts: Vec<FailedAttempt>,
}

//! DTOs for health check endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::StatusReport;
use crate::domain::delivery::{ProbeResult, TransportInfo, VerificationReport};

/// Service identifier reported by `/health`.
pub const SERVICE_ID: &str = "tire-lead-api";

/// Health check response with transport reachability.
///
/// `smtpError` is serialized as `null` rather than omitted so clients can
/// rely on the key being present.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub smtp_configured: bool,
    pub smtp_status: &'static str,
    pub smtp_error: Option<String>,
    pub resend_configured: bool,
    pub leads_count: usize,
    pub active_transport: Option<TransportInfo>,
    pub transports: Vec<ProbeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_verification: Option<VerificationReport>,
}

impl HealthResponse {
    pub fn new(report: StatusReport, environment: String) -> Self {
        Self {
            status: "ok",
            timestamp: report.checked_at,
            service: SERVICE_ID,
            version: env!("CARGO_PKG_VERSION"),
            environment,
            smtp_configured: report.smtp_configured,
            smtp_status: report.smtp_status().as_str(),
            smtp_error: report.smtp_error(),
            resend_configured: report.api_configured,
            leads_count: report.leads_count,
            active_transport: report.active,
            transports: report.probes,
            startup_verification: report.startup,
        }
    }
}

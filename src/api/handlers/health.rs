//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Returns service health with a live probe of every mail transport.
///
/// # Endpoint
///
/// `GET /health`
///
/// Always responds 200: an unreachable provider degrades notifications but
/// leads are still accepted. Probes run concurrently, each bounded by its
/// transport's own timeout.
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "timestamp": "2024-06-10T06:13:20Z",
///   "service": "tire-lead-api",
///   "version": "0.1.0",
///   "environment": "production",
///   "smtpConfigured": true,
///   "smtpStatus": "ready",
///   "smtpError": null,
///   "resendConfigured": false,
///   "leadsCount": 3,
///   "activeTransport": { "name": "smtp-primary", "kind": "smtp" },
///   "transports": [
///     { "transport": { "name": "smtp-primary", "kind": "smtp" }, "reachable": true }
///   ]
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = state.status_service.report().await;

    Json(HealthResponse::new(report, state.environment.clone()))
}

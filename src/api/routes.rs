//! API route configuration.

use crate::api::handlers::{
    health_handler, leads_handler, root_handler, send_lead_handler, test_email_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes. The service has no authentication.
///
/// # Endpoints
///
/// - `GET  /`            - Service metadata
/// - `POST /send-lead`   - Record a lead and notify
/// - `GET  /leads`       - Most recent leads (up to 20)
/// - `GET  /health`      - Health with live transport probes
/// - `GET  /test-email`  - Send a diagnostic email
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/send-lead", post(send_lead_handler))
        .route("/leads", get(leads_handler))
        .route("/health", get(health_handler))
        .route("/test-email", get(test_email_handler))
}

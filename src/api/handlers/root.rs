//! Handler for the service metadata endpoint.

use axum::{Json, extract::State};

use crate::api::dto::service_info::ServiceInfoResponse;
use crate::state::AppState;

/// Describes the service and lists its endpoints.
///
/// # Endpoint
///
/// `GET /`
pub async fn root_handler(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse::new(state.environment.clone()))
}

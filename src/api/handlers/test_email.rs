//! Handler for the diagnostic email endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::lead::MessageIds;
use crate::api::dto::test_email::{TestEmailFailure, TestEmailResponse};
use crate::domain::delivery::DeliveryResult;
use crate::state::AppState;

/// Sends a fixed diagnostic message through the fallback chain.
///
/// # Endpoint
///
/// `GET /test-email`
///
/// # Response Codes
///
/// - **200 OK**: A transport accepted the message
/// - **500 Internal Server Error**: Every transport failed, or none is configured
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Test email sent",
///   "emailId": "4ef9a417-02e9-4d39-ad75-9611e0fcc33c",
///   "transport": { "name": "resend", "kind": "api" }
/// }
/// ```
pub async fn test_email_handler(
    State(state): State<AppState>,
) -> Result<Json<TestEmailResponse>, (StatusCode, Json<TestEmailFailure>)> {
    match state.notification_service.send_test().await {
        DeliveryResult::Sent {
            transport,
            message_id,
            ..
        } => Ok(Json(TestEmailResponse {
            success: true,
            message: "Test email sent",
            ids: MessageIds::new(&transport, message_id),
            transport,
        })),
        DeliveryResult::Failed {
            failure,
            failed_attempts,
        } => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(TestEmailFailure {
                success: false,
                error: failure.message,
                kind: failure.kind,
                failed_attempts,
            }),
        )),
    }
}

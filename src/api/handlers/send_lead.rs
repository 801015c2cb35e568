//! Handler for lead submission endpoint.

use axum::{Json, extract::State};

use crate::api::dto::lead::SendLeadResponse;
use crate::api::extractors::LeadPayload;
use crate::error::AppError;
use crate::state::AppState;

/// Records a lead and notifies the configured recipient.
///
/// # Endpoint
///
/// `POST /send-lead`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Jo",
///   "email": "jo@x.com",
///   "phone": "555-1",
///   "searchType": "By Tire Size",
///   "frontTireSize": "225/45R17"
/// }
/// ```
///
/// The same fields may also be posted as `application/x-www-form-urlencoded`.
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Lead sent successfully",
///   "leadId": "1718000000000",
///   "receivedAt": "2024-06-10T06:13:20Z",
///   "deliveryStatus": "sent",
///   "messageId": "<1718000000000.5f2c@example.com>",
///   "transport": { "name": "smtp-primary", "kind": "smtp" }
/// }
/// ```
///
/// When every transport fails the lead is still recorded and the response is
/// still 200, with `deliveryStatus: "failed-but-recorded"`, a `note` and the
/// classified `error`.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is neither a JSON object nor a form,
/// or if `name`, `email` or `phone` is missing or empty. Nothing is recorded
/// in that case.
pub async fn send_lead_handler(
    State(state): State<AppState>,
    LeadPayload(submission): LeadPayload,
) -> Result<Json<SendLeadResponse>, AppError> {
    let receipt = state.lead_service.submit(submission).await?;

    Ok(Json(SendLeadResponse::from(receipt)))
}

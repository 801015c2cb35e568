//! Handler for recent leads listing.

use axum::{Json, extract::State};

use crate::api::dto::lead::LeadListResponse;
use crate::state::AppState;

/// Maximum number of leads returned by `/leads`.
pub const RECENT_LEADS_LIMIT: usize = 20;

/// Lists the most recent leads, newest first.
///
/// # Endpoint
///
/// `GET /leads`
///
/// # Response
///
/// ```json
/// {
///   "count": 2,
///   "total": 2,
///   "leads": [
///     { "id": "1718000000001", "receivedAt": "...", "name": "Ann", ... },
///     { "id": "1718000000000", "receivedAt": "...", "name": "Jo", ... }
///   ]
/// }
/// ```
pub async fn leads_handler(State(state): State<AppState>) -> Json<LeadListResponse> {
    let leads = state.lead_service.recent(RECENT_LEADS_LIMIT);

    Json(LeadListResponse {
        count: leads.len(),
        total: state.lead_service.count(),
        leads,
    })
}

//! Top-level router configuration.
//!
//! # Route Structure
//!
//! See [`crate::api::routes::public_routes`]. Unknown paths get a JSON 404.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin, no credentials
//! - **Panic catching** - Generic JSON 500 instead of a dropped connection
//! - **Rate limiting** - Per-IP token bucket (optional)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::not_found_handler;
use crate::api::middleware::{cors, rate_limit, tracing};
use crate::config::RateLimitSettings;
use crate::error::panic_response;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware except path
/// normalization.
pub fn build_router(state: AppState, rate_limit: &RateLimitSettings) -> Router {
    let mut router = api::routes::public_routes()
        .fallback(not_found_handler)
        .with_state(state);

    if let Some(limiter) = rate_limit::layer(rate_limit) {
        router = router.layer(limiter);
    }

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors::layer())
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before
/// routing.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - per-IP limits; when enabled the server must provide peer
///   addresses via `into_make_service_with_connect_info`
pub fn app_router(state: AppState, rate_limit: &RateLimitSettings) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, rate_limit))
}

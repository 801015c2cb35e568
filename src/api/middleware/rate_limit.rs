//! Per-IP rate limiting using a token bucket.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

use crate::config::RateLimitSettings;

/// Layer type produced by [`layer`].
pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates the rate limiter for all public endpoints.
///
/// Limits come from [`RateLimitSettings`] (default 2 requests per second,
/// burst of 100). Requests exceeding the limit receive
/// `429 Too Many Requests`.
///
/// Clients are keyed by the socket peer address, so the server must be
/// started with `into_make_service_with_connect_info::<SocketAddr>`.
///
/// Returns `None` when the settings are invalid (zero rate or burst) or
/// rate limiting is disabled.
pub fn layer(settings: &RateLimitSettings) -> Option<RateLimitLayer> {
    if !settings.enabled {
        return None;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(settings.per_second)
        .burst_size(settings.burst_size)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_settings_produce_no_layer() {
        assert!(layer(&RateLimitSettings::disabled()).is_none());
    }

    #[test]
    fn test_default_settings_produce_layer() {
        assert!(layer(&RateLimitSettings::default()).is_some());
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        let settings = RateLimitSettings {
            enabled: true,
            per_second: 2,
            burst_size: 0,
        };
        assert!(layer(&settings).is_none());
    }
}

//! Rate limiting middleware using governor and `tower_governor`.
//!
//! The coupon validation endpoint is the only one worth limiting: its
//! undifferentiated error keeps single probes uninformative, and the rate
//! limit keeps bulk code guessing impractical.

use std::sync::Arc;

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Rate limiter layer type for Axum.
///
/// Uses `SmartIpKeyExtractor` to get the real client IP from common proxy
/// headers, falling back to the peer address (requires serving with
/// `into_make_service_with_connect_info`).
pub type RateLimiterLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create the rate limiter for coupon validation: ~30 requests per minute
/// per IP (replenish 1 token every 2 seconds, burst of 10).
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(2)` and `burst_size(10)`), which are always
/// accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn coupon_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(2)
        .burst_size(10)
        .finish()
        .expect("rate limiter config with per_second(2) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}

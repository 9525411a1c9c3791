//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing)
//! 2. Request ID (add unique ID to each request)
//! 3. Rate limiting (governor, coupon validation only)

pub mod rate_limit;
pub mod request_id;

pub use rate_limit::coupon_rate_limiter;
pub use request_id::request_id_middleware;

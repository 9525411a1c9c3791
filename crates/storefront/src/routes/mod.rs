//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! # Abandonment lifecycle
//! POST /abandonment-events      - Record a trigger, issue a coupon
//! GET  /abandonment-events      - List recorded events
//! POST /coupons/validate        - Check a coupon code (rate limited)
//!
//! # Checkout
//! POST /orders                  - Place an order, redeem coupon if any
//!
//! # Reporting
//! GET  /analytics               - Aggregated abandonment analytics
//!
//! # Catalog
//! GET  /products/{id}           - Fetch one product
//! PUT  /products/{id}           - Partial product update (coupon toggle)
//! ```

pub mod abandonment;
pub mod analytics;
pub mod coupons;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::coupon_rate_limiter;
use crate::state::AppState;

/// Create the storefront API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/abandonment-events",
            post(abandonment::record).get(abandonment::list),
        )
        .route(
            "/coupons/validate",
            post(coupons::validate).layer(coupon_rate_limiter()),
        )
        .route("/orders", post(orders::place))
        .route("/analytics", get(analytics::report))
        .route(
            "/products/{id}",
            get(products::get_product).put(products::update_product),
        )
}

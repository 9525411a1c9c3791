//! Database operations for the storefront `PostgreSQL`.
//!
//! # Tables (schema `storefront`)
//!
//! - `store` - Tenant root
//! - `product` - Catalog (read-only for the lifecycle)
//! - `coupon` - Single-use discount codes
//! - `abandonment_event` - One row per recorded trigger
//! - `abandonment_cart_item` - Immutable cart snapshots per event
//! - `orders` / `order_item` - Placed orders with price snapshots
//!
//! All queries use the sqlx runtime API; write paths take
//! `impl PgExecutor<'_>` so services can run several of them inside one
//! transaction (`&mut *tx`) and reads can go straight to the pool.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p navona-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod abandonment;
pub mod analytics;
pub mod coupons;
pub mod orders;
pub mod products;
pub mod stores;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

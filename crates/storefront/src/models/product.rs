//! Product catalog model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use navona_core::{ProductId, StoreId};

/// A catalog product. Read-only from the lifecycle's perspective; the only
/// write path is the admin partial update on `PUT /products/{id}`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image: String,
    pub stock: i32,
    pub category: Option<String>,
    /// Whether this product may participate in coupon-eligible abandonment
    /// triggers.
    pub is_accept_coupon: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

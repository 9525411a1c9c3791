//! Abandonment event and cart snapshot models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use navona_core::{
    AbandonmentCartItemId, AbandonmentEventId, CouponId, ProductId, SessionId, StoreId,
    TriggerEvent,
};

/// One recorded trigger occurrence.
///
/// Created together with its coupon in a single transaction, and mutated
/// exactly once: when the coupon is redeemed by an order, `is_accepted` and
/// `is_checkout_completed` flip to true together. Events are never deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AbandonmentEvent {
    pub id: AbandonmentEventId,
    pub store_id: StoreId,
    pub session_id: SessionId,
    pub coupon_id: CouponId,
    pub trigger_event: TriggerEvent,
    pub is_accepted: bool,
    pub is_checkout_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Immutable snapshot of one cart line at trigger time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AbandonmentCartItem {
    pub id: AbandonmentCartItemId,
    pub abandonment_event_id: AbandonmentEventId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Decimal,
    pub product_quantity: i32,
    pub created_at: DateTime<Utc>,
}

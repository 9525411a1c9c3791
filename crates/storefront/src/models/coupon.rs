//! Coupon model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use navona_core::{CouponId, SessionId, StoreId};

/// A single-use, time-boxed discount code scoped to one store and one
/// session.
///
/// A coupon is valid for use iff `is_redeemed == false` and
/// `expires_at >= now`. Once `is_redeemed` flips to true it is permanently
/// terminal; there is no un-redeem path.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub store_id: StoreId,
    pub session_id: SessionId,
    pub code: String,
    pub discount_percent: Decimal,
    pub is_redeemed: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

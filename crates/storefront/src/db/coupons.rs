//! Coupon queries.
//!
//! The validity predicate (`is_redeemed = false AND expires_at >= now`) is
//! always evaluated inside the query, never reconstructed in Rust, so
//! validation and redemption cannot drift apart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;

use navona_core::{CouponId, SessionId, StoreId};

use super::RepositoryError;
use crate::models::Coupon;

const COUPON_COLUMNS: &str = "id, store_id, session_id, code, discount_percent, \
                              is_redeemed, expires_at, created_at, updated_at";

/// Payload for issuing a coupon.
///
/// `issued_at` is persisted as `created_at` so that `expires_at` stays
/// exactly `created_at` plus the validity window; letting the column default
/// stamp the row would drift by the insert latency.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub store_id: StoreId,
    pub session_id: SessionId,
    pub code: String,
    pub discount_percent: Decimal,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Insert a freshly issued coupon.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the generated code collides with
/// an existing one, `RepositoryError::Database` for other failures.
pub async fn insert(
    executor: impl PgExecutor<'_>,
    new: &NewCoupon,
) -> Result<Coupon, RepositoryError> {
    let coupon = sqlx::query_as::<_, Coupon>(&format!(
        r"
        INSERT INTO storefront.coupon
            (store_id, session_id, code, discount_percent, expires_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING {COUPON_COLUMNS}
        "
    ))
    .bind(new.store_id)
    .bind(&new.session_id)
    .bind(&new.code)
    .bind(new.discount_percent)
    .bind(new.expires_at)
    .bind(new.issued_at)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("coupon code already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Ok(coupon)
}

/// Find a coupon that is still valid for use.
///
/// Matches store, session, and code together with the validity predicate.
/// A miss means wrong code, already redeemed, expired, or a session/store
/// mismatch; callers must not distinguish between those cases.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_valid(
    executor: impl PgExecutor<'_>,
    store_id: StoreId,
    session_id: &SessionId,
    code: &str,
    now: DateTime<Utc>,
) -> Result<Option<Coupon>, RepositoryError> {
    let coupon = sqlx::query_as::<_, Coupon>(&format!(
        r"
        SELECT {COUPON_COLUMNS}
        FROM storefront.coupon
        WHERE store_id = $1
          AND session_id = $2
          AND code = $3
          AND is_redeemed = false
          AND expires_at >= $4
        "
    ))
    .bind(store_id)
    .bind(session_id)
    .bind(code)
    .bind(now)
    .fetch_optional(executor)
    .await?;

    Ok(coupon)
}

/// Atomically claim a coupon for redemption (compare-and-set).
///
/// The `WHERE is_redeemed = false` clause makes redemption first-writer-wins:
/// of two racing orders, exactly one gets the row back, the other gets
/// `None`. Run this inside the order transaction so a later failure rolls
/// the claim back.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn claim(
    executor: impl PgExecutor<'_>,
    id: CouponId,
    now: DateTime<Utc>,
) -> Result<Option<Coupon>, RepositoryError> {
    let coupon = sqlx::query_as::<_, Coupon>(&format!(
        r"
        UPDATE storefront.coupon
        SET is_redeemed = true, updated_at = now()
        WHERE id = $1
          AND is_redeemed = false
          AND expires_at >= $2
        RETURNING {COUPON_COLUMNS}
        "
    ))
    .bind(id)
    .bind(now)
    .fetch_optional(executor)
    .await?;

    Ok(coupon)
}

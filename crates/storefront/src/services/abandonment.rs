//! Abandonment event recording, coupon issuance, and coupon validation.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use navona_core::coupon;
use navona_core::{ProductId, SessionId, StoreId, TriggerEvent};

use crate::config::CouponSettings;
use crate::db::{
    self, RepositoryError,
    abandonment::{CartItemSnapshot, NewAbandonmentEvent},
    coupons::NewCoupon,
};
use crate::error::{AppError, Result};
use crate::models::{AbandonmentCartItem, AbandonmentEvent, Coupon};

/// One cart line as submitted by the trigger-detection client.
///
/// Name and price are client-reported display values captured for the
/// snapshot; they are never used to price anything.
#[derive(Debug, Clone)]
pub struct CartItemInput {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// A validated request to record one trigger occurrence.
#[derive(Debug, Clone)]
pub struct RecordAbandonment {
    pub store_id: StoreId,
    pub session_id: SessionId,
    pub trigger: TriggerEvent,
    pub items: Vec<CartItemInput>,
}

/// Everything created by a successful recording.
#[derive(Debug, Clone)]
pub struct AbandonmentReceipt {
    pub coupon: Coupon,
    pub event: AbandonmentEvent,
    pub cart_items: Vec<AbandonmentCartItem>,
}

/// The coupon/abandonment lifecycle service.
pub struct AbandonmentService<'a> {
    pool: &'a PgPool,
    settings: &'a CouponSettings,
}

impl<'a> AbandonmentService<'a> {
    /// Create a new lifecycle service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, settings: &'a CouponSettings) -> Self {
        Self { pool, settings }
    }

    /// Record a trigger occurrence: issue a coupon, create the event, and
    /// snapshot the cart, all in one transaction.
    ///
    /// # Errors
    ///
    /// - `AppError::NotFound` when the store does not exist
    /// - `AppError::Validation` when any item id is absent from the catalog
    ///   (checked against the full input set before any write)
    /// - `AppError::Database` on storage failures; nothing is persisted
    pub async fn record(&self, cmd: RecordAbandonment) -> Result<AbandonmentReceipt> {
        db::stores::find_by_id(self.pool, cmd.store_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store".to_owned()))?;

        let item_ids: Vec<ProductId> = cmd.items.iter().map(|item| item.product_id).collect();
        let existing = db::products::existing_ids(self.pool, &item_ids).await?;
        let invalid: Vec<String> = item_ids
            .iter()
            .filter(|id| !existing.contains(id))
            .map(ToString::to_string)
            .collect();
        if !invalid.is_empty() {
            return Err(AppError::Validation(format!(
                "Invalid item IDs: {}",
                invalid.join(", ")
            )));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let coupon = db::coupons::insert(
            &mut *tx,
            &NewCoupon {
                store_id: cmd.store_id,
                session_id: cmd.session_id.clone(),
                code: coupon::generate_code(
                    self.settings.code_prefix.as_deref(),
                    self.settings.code_length,
                ),
                discount_percent: coupon::discount_percent(),
                issued_at: now,
                expires_at: coupon::expiry_from(now),
            },
        )
        .await?;

        let event = db::abandonment::insert_event(
            &mut *tx,
            &NewAbandonmentEvent {
                store_id: cmd.store_id,
                session_id: cmd.session_id,
                coupon_id: coupon.id,
                trigger_event: cmd.trigger,
            },
        )
        .await?;

        let snapshots: Vec<CartItemSnapshot> = cmd
            .items
            .into_iter()
            .map(|item| CartItemSnapshot {
                product_id: item.product_id,
                product_name: item.name,
                product_price: item.price,
                product_quantity: item.quantity,
            })
            .collect();
        let cart_items =
            db::abandonment::insert_cart_items(&mut *tx, event.id, &snapshots).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            event_id = %event.id,
            coupon_code = %coupon.code,
            trigger = %event.trigger_event,
            items = cart_items.len(),
            "Abandonment event recorded"
        );

        Ok(AbandonmentReceipt {
            coupon,
            event,
            cart_items,
        })
    }

    /// List all recorded events.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failures.
    pub async fn list(&self) -> Result<Vec<AbandonmentEvent>> {
        Ok(db::abandonment::list_events(self.pool).await?)
    }

    /// Check a coupon code against its validity predicate.
    ///
    /// Read-only and idempotent; safe to call repeatedly for discount
    /// previews. Any miss is the same undifferentiated
    /// `AppError::InvalidOrExpired`.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidOrExpired` when no valid coupon matches
    /// - `AppError::Database` on storage failures
    pub async fn validate_coupon(
        &self,
        store_id: StoreId,
        session_id: &SessionId,
        code: &str,
    ) -> Result<Coupon> {
        db::coupons::find_valid(self.pool, store_id, session_id, code, Utc::now())
            .await?
            .ok_or(AppError::InvalidOrExpired)
    }
}

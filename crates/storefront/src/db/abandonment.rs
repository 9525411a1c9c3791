//! Abandonment event and cart snapshot queries.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use navona_core::{AbandonmentEventId, CouponId, ProductId, SessionId, StoreId, TriggerEvent};

use super::RepositoryError;
use crate::models::{AbandonmentCartItem, AbandonmentEvent};

const EVENT_COLUMNS: &str = "id, store_id, session_id, coupon_id, trigger_event, \
                             is_accepted, is_checkout_completed, created_at";

const CART_ITEM_COLUMNS: &str = "id, abandonment_event_id, product_id, product_name, \
                                 product_price, product_quantity, created_at";

/// Payload for recording an event.
#[derive(Debug, Clone)]
pub struct NewAbandonmentEvent {
    pub store_id: StoreId,
    pub session_id: SessionId,
    pub coupon_id: CouponId,
    pub trigger_event: TriggerEvent,
}

/// One cart line to snapshot under an event.
#[derive(Debug, Clone)]
pub struct CartItemSnapshot {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Decimal,
    pub product_quantity: i32,
}

/// Insert a new abandonment event referencing its coupon.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn insert_event(
    executor: impl PgExecutor<'_>,
    new: &NewAbandonmentEvent,
) -> Result<AbandonmentEvent, RepositoryError> {
    let event = sqlx::query_as::<_, AbandonmentEvent>(&format!(
        r"
        INSERT INTO storefront.abandonment_event (store_id, session_id, coupon_id, trigger_event)
        VALUES ($1, $2, $3, $4)
        RETURNING {EVENT_COLUMNS}
        "
    ))
    .bind(new.store_id)
    .bind(&new.session_id)
    .bind(new.coupon_id)
    .bind(new.trigger_event)
    .fetch_one(executor)
    .await?;

    Ok(event)
}

/// Bulk-insert the cart snapshot rows for an event.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn insert_cart_items(
    executor: impl PgExecutor<'_>,
    event_id: AbandonmentEventId,
    items: &[CartItemSnapshot],
) -> Result<Vec<AbandonmentCartItem>, RepositoryError> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO storefront.abandonment_cart_item \
         (abandonment_event_id, product_id, product_name, product_price, product_quantity) ",
    );
    builder.push_values(items, |mut row, item| {
        row.push_bind(event_id)
            .push_bind(item.product_id)
            .push_bind(item.product_name.clone())
            .push_bind(item.product_price)
            .push_bind(item.product_quantity);
    });
    builder.push(format!(" RETURNING {CART_ITEM_COLUMNS}"));

    let rows = builder
        .build_query_as::<AbandonmentCartItem>()
        .fetch_all(executor)
        .await?;

    Ok(rows)
}

/// List all recorded events, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_events(
    executor: impl PgExecutor<'_>,
) -> Result<Vec<AbandonmentEvent>, RepositoryError> {
    let events = sqlx::query_as::<_, AbandonmentEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM storefront.abandonment_event ORDER BY created_at DESC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(events)
}

/// Flip the linked event to its terminal redeemed state.
///
/// `is_accepted` and `is_checkout_completed` are set together in one UPDATE;
/// no path flips them independently. Returns the updated event, or `None`
/// when no event references the coupon.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn mark_redeemed(
    executor: impl PgExecutor<'_>,
    coupon_id: CouponId,
) -> Result<Option<AbandonmentEvent>, RepositoryError> {
    let event = sqlx::query_as::<_, AbandonmentEvent>(&format!(
        r"
        UPDATE storefront.abandonment_event
        SET is_accepted = true, is_checkout_completed = true
        WHERE coupon_id = $1
        RETURNING {EVENT_COLUMNS}
        "
    ))
    .bind(coupon_id)
    .fetch_optional(executor)
    .await?;

    Ok(event)
}

//! Order placement and coupon redemption.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use navona_core::money;
use navona_core::{CouponId, ProductId, SessionId};

use crate::db::{
    self, RepositoryError,
    orders::{NewOrder, NewOrderItem},
};
use crate::error::{AppError, Result};
use crate::models::{AbandonmentEvent, Coupon, OrderWithItems};

/// One order line as submitted by the checkout client. Prices are never
/// accepted from the client; only the product reference and quantity are.
#[derive(Debug, Clone, Copy)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A validated request to place an order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub session_id: SessionId,
    pub customer_email: String,
    pub customer_name: String,
    pub items: Vec<OrderItemInput>,
    pub coupon_id: Option<CouponId>,
}

/// Result of a successful placement. `coupon` and `event` are populated only
/// when a coupon was applied, and always together.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: OrderWithItems,
    pub coupon: Option<Coupon>,
    pub event: Option<AbandonmentEvent>,
}

/// The order placement service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order, redeeming a coupon if one is referenced.
    ///
    /// The total is computed strictly from server-side product prices. When
    /// `coupon_id` is set, the coupon is claimed with a compare-and-set
    /// update inside the order transaction: its validity is re-checked at
    /// claim time, and of two racing orders only one can win the claim. The
    /// linked abandonment event flips to accepted + checkout-completed in
    /// the same transaction.
    ///
    /// Placement is not idempotent: submitting the same request twice
    /// creates two orders.
    ///
    /// # Errors
    ///
    /// - `AppError::NotFound` when no store is provisioned
    /// - `AppError::MissingProducts` when any referenced product is absent
    /// - `AppError::InvalidOrExpired` when the coupon claim fails; the
    ///   transaction rolls back and no order is created
    /// - `AppError::Database` on storage failures
    pub async fn place(&self, cmd: PlaceOrder) -> Result<PlacedOrder> {
        let store = db::stores::find_first(self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Store".to_owned()))?;

        let product_ids: Vec<ProductId> =
            cmd.items.iter().map(|item| item.product_id).collect();
        let prices = db::products::price_map(self.pool, &product_ids).await?;

        let missing: Vec<ProductId> = product_ids
            .iter()
            .filter(|id| !prices.contains_key(id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingProducts(missing));
        }

        let subtotal = order_subtotal(&prices, &cmd.items);

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let (coupon, event, total) = if let Some(coupon_id) = cmd.coupon_id {
            let coupon = db::coupons::claim(&mut *tx, coupon_id, Utc::now())
                .await?
                .ok_or(AppError::InvalidOrExpired)?;
            let event = db::abandonment::mark_redeemed(&mut *tx, coupon.id).await?;
            let total = money::apply_discount(subtotal, coupon.discount_percent);
            (Some(coupon), event, total)
        } else {
            (None, None, money::round2(subtotal))
        };

        let order = db::orders::insert(
            &mut *tx,
            &NewOrder {
                store_id: store.id,
                session_id: cmd.session_id,
                customer_email: cmd.customer_email,
                customer_name: cmd.customer_name,
                total,
                status: "completed".to_owned(),
            },
        )
        .await?;

        let line_items: Vec<NewOrderItem> = cmd
            .items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price: prices.get(&item.product_id).copied().unwrap_or_default(),
            })
            .collect();
        let items = db::orders::insert_items(&mut *tx, order.id, &line_items).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            order_id = %order.id,
            total = %order.total,
            coupon_applied = coupon.is_some(),
            "Order created"
        );

        Ok(PlacedOrder {
            order: OrderWithItems { order, items },
            coupon,
            event,
        })
    }
}

/// Sum of server price x quantity across all lines, unrounded.
fn order_subtotal(
    prices: &HashMap<ProductId, Decimal>,
    items: &[OrderItemInput],
) -> Decimal {
    items
        .iter()
        .map(|item| {
            prices.get(&item.product_id).copied().unwrap_or_default()
                * Decimal::from(item.quantity)
        })
        .sum()
}

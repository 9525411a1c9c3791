//! Order queries.

use rust_decimal::Decimal;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use navona_core::{OrderId, ProductId, SessionId, StoreId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, store_id, session_id, customer_email, customer_name, \
                             total, status, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price, created_at";

/// Payload for creating an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub store_id: StoreId,
    pub session_id: SessionId,
    pub customer_email: String,
    pub customer_name: String,
    /// Post-discount total, already rounded to 2 decimal places.
    pub total: Decimal,
    pub status: String,
}

/// One order line to insert, with the server-side price snapshot.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// Insert the order row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn insert(
    executor: impl PgExecutor<'_>,
    new: &NewOrder,
) -> Result<Order, RepositoryError> {
    let order = sqlx::query_as::<_, Order>(&format!(
        r"
        INSERT INTO storefront.orders (store_id, session_id, customer_email, customer_name, total, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {ORDER_COLUMNS}
        "
    ))
    .bind(new.store_id)
    .bind(&new.session_id)
    .bind(&new.customer_email)
    .bind(&new.customer_name)
    .bind(new.total)
    .bind(&new.status)
    .fetch_one(executor)
    .await?;

    Ok(order)
}

/// Bulk-insert the order line items.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn insert_items(
    executor: impl PgExecutor<'_>,
    order_id: OrderId,
    items: &[NewOrderItem],
) -> Result<Vec<OrderItem>, RepositoryError> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO storefront.order_item (order_id, product_id, quantity, price) ",
    );
    builder.push_values(items, |mut row, item| {
        row.push_bind(order_id)
            .push_bind(item.product_id)
            .push_bind(item.quantity)
            .push_bind(item.price);
    });
    builder.push(format!(" RETURNING {ORDER_ITEM_COLUMNS}"));

    let rows = builder
        .build_query_as::<OrderItem>()
        .fetch_all(executor)
        .await?;

    Ok(rows)
}

//! Product queries.
//!
//! The lifecycle only reads the catalog: existence checks before writes and
//! authoritative prices for order totals. The one write path is the admin
//! partial update behind `PUT /products/{id}`.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use navona_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, store_id, name, description, price, image, stock, \
                               category, is_accept_coupon, created_at, updated_at";

/// Fields for a partial product update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub is_accept_coupon: Option<bool>,
}

/// Look up a product by id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(product)
}

/// Return the subset of `ids` that exist in the catalog.
///
/// Callers diff the result against their input to enumerate invalid ids
/// before any write happens.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn existing_ids(
    executor: impl PgExecutor<'_>,
    ids: &[ProductId],
) -> Result<HashSet<ProductId>, RepositoryError> {
    let raw: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();

    let found = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM storefront.product WHERE id = ANY($1)",
    )
    .bind(raw)
    .fetch_all(executor)
    .await?;

    Ok(found.into_iter().map(ProductId::new).collect())
}

/// Fetch server-side authoritative prices for a set of products.
///
/// Missing ids are simply absent from the map; callers treat that as a
/// missing-product error.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn price_map(
    executor: impl PgExecutor<'_>,
    ids: &[ProductId],
) -> Result<HashMap<ProductId, Decimal>, RepositoryError> {
    let raw: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();

    let rows = sqlx::query_as::<_, (Uuid, Decimal)>(
        "SELECT id, price FROM storefront.product WHERE id = ANY($1)",
    )
    .bind(raw)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, price)| (ProductId::new(id), price))
        .collect())
}

/// Apply a partial update to a product.
///
/// Returns `None` when the product does not exist.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn update(
    executor: impl PgExecutor<'_>,
    id: ProductId,
    patch: &ProductPatch,
) -> Result<Option<Product>, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        r"
        UPDATE storefront.product
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            stock = COALESCE($5, stock),
            category = COALESCE($6, category),
            is_accept_coupon = COALESCE($7, is_accept_coupon),
            updated_at = now()
        WHERE id = $1
        RETURNING {PRODUCT_COLUMNS}
        "
    ))
    .bind(id)
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(patch.price)
    .bind(patch.stock)
    .bind(&patch.category)
    .bind(patch.is_accept_coupon)
    .fetch_optional(executor)
    .await?;

    Ok(product)
}

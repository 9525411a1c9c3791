//! Store queries.

use sqlx::PgExecutor;

use navona_core::StoreId;

use super::RepositoryError;
use crate::models::Store;

/// Look up a store by id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: StoreId,
) -> Result<Option<Store>, RepositoryError> {
    let store = sqlx::query_as::<_, Store>(
        r"
        SELECT id, name, description, created_at, updated_at
        FROM storefront.store
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(store)
}

/// Fetch the first (oldest) store.
///
/// The demo deployment is single-tenant; order placement resolves its store
/// this way rather than requiring a `storeId` in the request.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_first(
    executor: impl PgExecutor<'_>,
) -> Result<Option<Store>, RepositoryError> {
    let store = sqlx::query_as::<_, Store>(
        r"
        SELECT id, name, description, created_at, updated_at
        FROM storefront.store
        ORDER BY created_at
        LIMIT 1
        ",
    )
    .fetch_optional(executor)
    .await?;

    Ok(store)
}

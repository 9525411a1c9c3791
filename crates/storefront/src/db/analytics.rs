//! Read-only aggregation over abandonment events.
//!
//! Pure projection; nothing here touches the lifecycle's write path.

use sqlx::PgExecutor;

use navona_core::TriggerEvent;

use super::RepositoryError;

/// Aggregate counters over all abandonment events.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct EventCounts {
    pub total: i64,
    pub accepted: i64,
    pub completed: i64,
}

/// Count events overall and by lifecycle flag, in one round trip.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn event_counts(
    executor: impl PgExecutor<'_>,
) -> Result<EventCounts, RepositoryError> {
    let counts = sqlx::query_as::<_, EventCounts>(
        r"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE is_accepted) AS accepted,
               COUNT(*) FILTER (WHERE is_checkout_completed) AS completed
        FROM storefront.abandonment_event
        ",
    )
    .fetch_one(executor)
    .await?;

    Ok(counts)
}

/// Event counts grouped by trigger kind.
///
/// Trigger values with no events are absent; the caller zero-fills.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn trigger_breakdown(
    executor: impl PgExecutor<'_>,
) -> Result<Vec<(TriggerEvent, i64)>, RepositoryError> {
    let rows = sqlx::query_as::<_, (TriggerEvent, i64)>(
        r"
        SELECT trigger_event, COUNT(*)
        FROM storefront.abandonment_event
        GROUP BY trigger_event
        ",
    )
    .fetch_all(executor)
    .await?;

    Ok(rows)
}

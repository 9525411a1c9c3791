//! Aggregated abandonment analytics.
//!
//! A read-only projection over abandonment events, consumed by the admin
//! dashboard. Not part of the lifecycle's write path.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use navona_core::TriggerEvent;

use crate::db;
use crate::error::Result;
use crate::state::AppState;

/// Event counts per trigger kind, zero-filled.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct TriggerBreakdown {
    #[serde(rename = "CURSOR_LEAVE")]
    pub cursor_leave: i64,
    #[serde(rename = "IDLE")]
    pub idle: i64,
    #[serde(rename = "SCROLLUP_FAST")]
    pub scrollup_fast: i64,
}

impl FromIterator<(TriggerEvent, i64)> for TriggerBreakdown {
    fn from_iter<I: IntoIterator<Item = (TriggerEvent, i64)>>(iter: I) -> Self {
        let mut breakdown = Self::default();
        for (trigger, count) in iter {
            match trigger {
                TriggerEvent::CursorLeave => breakdown.cursor_leave = count,
                TriggerEvent::Idle => breakdown.idle = count,
                TriggerEvent::ScrollupFast => breakdown.scrollup_fast = count,
            }
        }
        breakdown
    }
}

/// The analytics payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub total_events: i64,
    pub accepted_coupons: i64,
    pub completed_checkouts: i64,
    pub trigger_breakdown: TriggerBreakdown,
    pub conversion_rate: f64,
    pub acceptance_rate: f64,
}

/// Response wrapper for the analytics endpoint.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub analytics: AnalyticsData,
}

/// Report aggregated abandonment analytics.
#[instrument(skip_all)]
pub async fn report(State(state): State<AppState>) -> Result<Json<AnalyticsResponse>> {
    let counts = db::analytics::event_counts(state.pool()).await?;
    let breakdown: TriggerBreakdown = db::analytics::trigger_breakdown(state.pool())
        .await?
        .into_iter()
        .collect();

    let analytics = AnalyticsData {
        total_events: counts.total,
        accepted_coupons: counts.accepted,
        completed_checkouts: counts.completed,
        trigger_breakdown: breakdown,
        conversion_rate: percentage(counts.completed, counts.total),
        acceptance_rate: percentage(counts.accepted, counts.total),
    };

    Ok(Json(AnalyticsResponse {
        success: true,
        analytics,
    }))
}

/// `part` as a percentage of `total`; 0 when there are no events yet.
#[allow(clippy::cast_precision_loss)]
fn percentage(part: i64, total: i64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

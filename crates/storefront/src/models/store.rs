//! Store model (tenant root).

use chrono::{DateTime, Utc};
use serde::Serialize;

use navona_core::StoreId;

/// A store tenant. Created once at provisioning; the lifecycle never
/// mutates it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// The singleton tunables row (id = 1). `grace_minutes_default` is read at
/// pass creation and snapshotted into the pass, never referenced live.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: i32,
    pub grace_minutes_default: i32,
    pub max_visitors_per_attendant: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

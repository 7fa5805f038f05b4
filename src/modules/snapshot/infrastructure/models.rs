/// Diesel model for the run_snapshots table
use crate::schema::run_snapshots;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Insertable, Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = run_snapshots)]
pub struct SnapshotRow {
    pub key: String,
    pub payload: JsonValue,
    pub updated_at: DateTime<Utc>,
}

/// Diesel-based SnapshotStore
///
/// A snapshot is one JSONB value written with a single upsert, so readers see
/// either the previous snapshot or the new one.
use crate::modules::snapshot::domain::entities::Snapshot;
use crate::modules::snapshot::domain::repository::SnapshotStore;
use crate::modules::snapshot::infrastructure::models::SnapshotRow;
use crate::schema::run_snapshots;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::{DbConnection, DbPool};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

pub struct PgSnapshotStore {
    pool: DbPool,
}

impl PgSnapshotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> AppResult<DbConnection> {
        self.pool
            .get()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn get(&self, key: &str) -> AppResult<Option<Snapshot>> {
        let mut conn = self.get_conn()?;

        let row: Option<SnapshotRow> = run_snapshots::table
            .find(key)
            .select(SnapshotRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to read snapshot: {}", e)))?;

        match row {
            Some(row) => Ok(Some(serde_json::from_value(row.payload)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, snapshot: &Snapshot) -> AppResult<()> {
        let mut conn = self.get_conn()?;
        let row = SnapshotRow {
            key: key.to_string(),
            payload: serde_json::to_value(snapshot)?,
            updated_at: Utc::now(),
        };

        diesel::insert_into(run_snapshots::table)
            .values(&row)
            .on_conflict(run_snapshots::key)
            .do_update()
            .set((
                run_snapshots::payload.eq(&row.payload),
                run_snapshots::updated_at.eq(row.updated_at),
            ))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to write snapshot: {}", e)))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::delete(run_snapshots::table.find(key))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to remove snapshot: {}", e)))?;

        Ok(())
    }
}

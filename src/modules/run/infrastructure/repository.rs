/// Diesel-based implementations of RunStore and HistoryStore
///
/// `run_state` holds a single keyed row. Progress lives in its own column so
/// the frequent progress write never overwrites a concurrent deactivation.
use crate::modules::run::domain::entities::{RunProgress, RunState};
use crate::modules::run::domain::repository::{HistoryStore, RunStore};
use crate::modules::run::infrastructure::models::{
    HistoryEntryModel, NewHistoryEntry, RunStateModel, RunStateRow,
};
use crate::schema::{run_history, run_state};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::{DbConnection, DbPool};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

const RUN_STATE_KEY: &str = "current";

pub struct PgRunStore {
    pool: DbPool,
}

impl PgRunStore {
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
impl RunStore for PgRunStore {
    async fn get(&self) -> AppResult<RunState> {
        let mut conn = self.get_conn()?;

        let row: Option<RunStateModel> = run_state::table
            .find(RUN_STATE_KEY)
            .select(RunStateModel::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to read run state: {}", e)))?;

        match row {
            Some(row) => Ok(row.to_run_state()?),
            None => Ok(RunState::default()),
        }
    }

    async fn set(&self, state: &RunState) -> AppResult<()> {
        let mut conn = self.get_conn()?;
        let row = RunStateRow {
            key: RUN_STATE_KEY.to_string(),
            payload: serde_json::to_value(state)?,
            progress: serde_json::to_value(state.progress)?,
            updated_at: Utc::now(),
        };

        diesel::insert_into(run_state::table)
            .values(&row)
            .on_conflict(run_state::key)
            .do_update()
            .set((
                run_state::payload.eq(&row.payload),
                run_state::progress.eq(&row.progress),
                run_state::updated_at.eq(row.updated_at),
            ))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to write run state: {}", e)))?;

        Ok(())
    }

    async fn reset(&self) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::delete(run_state::table.find(RUN_STATE_KEY))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to reset run state: {}", e)))?;

        Ok(())
    }

    async fn set_progress(&self, progress: RunProgress) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::update(run_state::table.find(RUN_STATE_KEY))
            .set((
                run_state::progress.eq(serde_json::to_value(progress)?),
                run_state::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to write progress: {}", e)))?;

        Ok(())
    }
}

pub struct PgHistoryStore {
    pool: DbPool,
}

impl PgHistoryStore {
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
impl HistoryStore for PgHistoryStore {
    async fn set(&self, state: &RunState) -> AppResult<()> {
        let mut conn = self.get_conn()?;
        let entry = NewHistoryEntry::from_run_state(state)?;

        diesel::insert_into(run_history::table)
            .values(&entry)
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to record run history: {}", e)))?;

        Ok(())
    }

    async fn list(&self, limit: usize) -> AppResult<Vec<RunState>> {
        let mut conn = self.get_conn()?;

        let rows: Vec<HistoryEntryModel> = run_history::table
            .order(run_history::recorded_at.desc())
            .limit(limit as i64)
            .select(HistoryEntryModel::as_select())
            .load(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to load run history: {}", e)))?;

        rows.into_iter()
            .map(|row| row.to_run_state().map_err(AppError::from))
            .collect()
    }
}

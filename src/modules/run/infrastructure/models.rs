/// Diesel models for run_state and run_history tables
use crate::modules::run::domain::entities::RunState;
use crate::modules::run::domain::value_objects::RunStageDb;
use crate::schema::{run_history, run_state};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Insertable, Debug)]
#[diesel(table_name = run_state)]
pub struct RunStateRow {
    pub key: String,
    pub payload: JsonValue,
    pub progress: JsonValue,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = run_state)]
pub struct RunStateModel {
    pub key: String,
    pub payload: JsonValue,
    pub progress: JsonValue,
    pub updated_at: DateTime<Utc>,
}

impl RunStateModel {
    /// Convert to domain RunState; the progress column wins over the payload copy
    pub fn to_run_state(self) -> Result<RunState, serde_json::Error> {
        let mut state: RunState = serde_json::from_value(self.payload)?;
        state.progress = serde_json::from_value(self.progress)?;
        Ok(state)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = run_history)]
pub struct NewHistoryEntry {
    pub run_id: Option<Uuid>,
    pub repository: String,
    pub stage: RunStageDb,
    pub result_id: Option<String>,
    pub error: Option<String>,
    pub payload: JsonValue,
}

impl NewHistoryEntry {
    pub fn from_run_state(state: &RunState) -> Result<Self, serde_json::Error> {
        Ok(Self {
            run_id: state.run_id,
            repository: state.settings.repository.clone(),
            stage: state.stage.into(),
            result_id: state.result_id.clone(),
            error: state.error.clone(),
            payload: serde_json::to_value(state)?,
        })
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = run_history)]
pub struct HistoryEntryModel {
    pub id: Uuid,
    pub run_id: Option<Uuid>,
    pub repository: String,
    pub stage: RunStageDb,
    pub result_id: Option<String>,
    pub error: Option<String>,
    pub payload: JsonValue,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntryModel {
    pub fn to_run_state(self) -> Result<RunState, serde_json::Error> {
        let mut state: RunState = serde_json::from_value(self.payload)?;
        // Indexed columns are authoritative
        state.stage = self.stage.into();
        state.result_id = self.result_id;
        state.error = self.error;
        Ok(state)
    }
}

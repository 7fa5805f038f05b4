/// Value objects for the run domain
use super::entities::RunStage;
use serde::{Deserialize, Serialize};

/// Run stage enum matching the `run_stage` database type
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::RunStage"]
#[serde(rename_all = "snake_case")]
pub enum RunStageDb {
    Idle,
    FetchingUsers,
    Done,
    Error,
}

impl From<RunStage> for RunStageDb {
    fn from(stage: RunStage) -> Self {
        match stage {
            RunStage::Idle => RunStageDb::Idle,
            RunStage::FetchingUsers => RunStageDb::FetchingUsers,
            RunStage::Done => RunStageDb::Done,
            RunStage::Error => RunStageDb::Error,
        }
    }
}

impl From<RunStageDb> for RunStage {
    fn from(stage: RunStageDb) -> Self {
        match stage {
            RunStageDb::Idle => RunStage::Idle,
            RunStageDb::FetchingUsers => RunStage::FetchingUsers,
            RunStageDb::Done => RunStage::Done,
            RunStageDb::Error => RunStage::Error,
        }
    }
}

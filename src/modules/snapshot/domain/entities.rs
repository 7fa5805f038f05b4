use crate::modules::backlog::{Backlog, BacklogError, Task};
use crate::modules::results::ResultSet;
use crate::modules::run::RunState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_KEY: &str = "forklens.run";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub items: Vec<Task>,
    pub head_index: usize,
    pub tail_index: usize,
    pub run_state: RunState,
    pub results: ResultSet,
    pub taken_at: DateTime<Utc>,
}

/// Everything a restarted process needs to continue a run
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredRun {
    pub backlog: Backlog,
    pub run_state: RunState,
    pub results: ResultSet,
}

impl Snapshot {
    pub fn capture(backlog: &Backlog, run_state: RunState, results: ResultSet) -> Self {
        Self {
            items: backlog.items().to_vec(),
            head_index: backlog.head_index(),
            tail_index: backlog.tail_index(),
            run_state,
            results,
            taken_at: Utc::now(),
        }
    }

    pub fn restore(self) -> Result<RestoredRun, BacklogError> {
        let backlog = Backlog::restore(self.items, self.head_index, self.tail_index)?;
        Ok(RestoredRun {
            backlog,
            run_state: self.run_state,
            results: self.results,
        })
    }
}

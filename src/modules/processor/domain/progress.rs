//! Write cadence for the progress record and the full snapshot.
//!
//! The progress record is written often. The snapshot carries the whole
//! backlog and result set, so it is written far less often and only on a
//! tick that also writes progress.

use crate::shared::config::ProcessorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistPlan {
    pub progress: bool,
    pub snapshot: bool,
}

/// `length` is the backlog length after the dequeue, `tail` the total enqueued
pub fn plan_persistence(length: usize, tail: usize, config: &ProcessorConfig) -> PersistPlan {
    let progress = length <= 1 || length % config.progress_every.max(1) == 0;
    let snapshot =
        progress && (length <= 1 || length % config.snapshot_every.max(1) == 0 || tail == 0);

    PersistPlan { progress, snapshot }
}

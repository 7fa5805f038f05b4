/// Store ports for run state and run history
///
/// The run store is the boundary to observers in another execution context:
/// they poll it for progress and clear `active` to cancel a run.
use super::entities::{RunProgress, RunState};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait RunStore: Send + Sync {
    /// Current state; an unset store reads as `RunState::default()`
    async fn get(&self) -> AppResult<RunState>;

    async fn set(&self, state: &RunState) -> AppResult<()>;

    /// Back to IDLE, inactive, no settings
    async fn reset(&self) -> AppResult<()>;

    /// Lightweight progress write. Implementations backed by shared storage
    /// should update only the progress so a concurrent deactivation is kept.
    async fn set_progress(&self, progress: RunProgress) -> AppResult<()> {
        let mut state = self.get().await?;
        state.progress = progress;
        self.set(&state).await
    }
}

/// Append-only audit of finished runs
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn set(&self, state: &RunState) -> AppResult<()>;

    /// Most recent entries first
    async fn list(&self, limit: usize) -> AppResult<Vec<RunState>>;
}

/// In-memory run and history stores
///
/// Used when no database is configured and by the test suite.
use crate::modules::run::domain::entities::{RunProgress, RunState};
use crate::modules::run::domain::repository::{HistoryStore, RunStore};
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryRunStore {
    state: RwLock<RunState>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RunState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl RunStore for InMemoryRunStore {
    async fn get(&self) -> AppResult<RunState> {
        Ok(self.state.read().await.clone())
    }

    async fn set(&self, state: &RunState) -> AppResult<()> {
        *self.state.write().await = state.clone();
        Ok(())
    }

    async fn reset(&self) -> AppResult<()> {
        *self.state.write().await = RunState::default();
        Ok(())
    }

    async fn set_progress(&self, progress: RunProgress) -> AppResult<()> {
        self.state.write().await.progress = progress;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<RunState>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn set(&self, state: &RunState) -> AppResult<()> {
        self.entries.write().await.push(state.clone());
        Ok(())
    }

    async fn list(&self, limit: usize) -> AppResult<Vec<RunState>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}

/// Store port for the accumulated result set
use super::entities::{EnrichedUser, ResultSet};
use crate::modules::backlog::TaskCategory;
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn get(&self, category: TaskCategory, subject_url: &str)
        -> AppResult<Option<EnrichedUser>>;

    /// Overwrites any prior record for the same key
    async fn set(
        &self,
        category: TaskCategory,
        subject_url: &str,
        record: EnrichedUser,
    ) -> AppResult<()>;

    /// Clear everything
    async fn refresh(&self) -> AppResult<()>;

    async fn all(&self) -> AppResult<ResultSet>;

    /// Replace the whole set, used when resuming from a snapshot
    async fn replace(&self, results: ResultSet) -> AppResult<()>;
}

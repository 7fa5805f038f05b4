use super::entities::Snapshot;
use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Durable key-value substrate for snapshots.
///
/// `set` must replace the stored value atomically.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<Snapshot>>;

    async fn set(&self, key: &str, snapshot: &Snapshot) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;
}

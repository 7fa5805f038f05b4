/// In-memory snapshot store
///
/// Holds the serialized form rather than the struct so a reload goes through
/// the same decode path as the durable store.
use crate::modules::snapshot::domain::entities::Snapshot;
use crate::modules::snapshot::domain::repository::SnapshotStore;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemorySnapshotStore {
    values: RwLock<HashMap<String, Value>>,
    writes: AtomicUsize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.values.read().await.contains_key(key)
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn get(&self, key: &str) -> AppResult<Option<Snapshot>> {
        let values = self.values.read().await;
        match values.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, snapshot: &Snapshot) -> AppResult<()> {
        let value = serde_json::to_value(snapshot)?;
        self.values.write().await.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

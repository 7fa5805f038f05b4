/// Concurrent in-memory result store
///
/// Enrichment tasks overlap, so writes come from several tokio tasks at once.
use crate::modules::backlog::TaskCategory;
use crate::modules::results::domain::entities::{EnrichedUser, ResultSet};
use crate::modules::results::domain::repository::ResultStore;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use dashmap::DashMap;

#[derive(Default)]
pub struct InMemoryResultStore {
    records: DashMap<(TaskCategory, String), EnrichedUser>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn get(
        &self,
        category: TaskCategory,
        subject_url: &str,
    ) -> AppResult<Option<EnrichedUser>> {
        Ok(self
            .records
            .get(&(category, subject_url.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn set(
        &self,
        category: TaskCategory,
        subject_url: &str,
        record: EnrichedUser,
    ) -> AppResult<()> {
        self.records.insert((category, subject_url.to_string()), record);
        Ok(())
    }

    async fn refresh(&self) -> AppResult<()> {
        self.records.clear();
        Ok(())
    }

    async fn all(&self) -> AppResult<ResultSet> {
        let mut results = ResultSet::new();
        for entry in self.records.iter() {
            let (category, url) = entry.key();
            results.insert(*category, url.clone(), entry.value().clone());
        }
        Ok(results)
    }

    async fn replace(&self, results: ResultSet) -> AppResult<()> {
        self.records.clear();
        for (category, url, record) in results.iter() {
            self.records.insert((category, url.clone()), record.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::results::domain::entities::UserFlags;
    use serde_json::Map;

    fn record(events: usize) -> EnrichedUser {
        EnrichedUser::merge(
            Map::new(),
            UserFlags {
                event_count: events,
                ..Default::default()
            },
            None,
        )
    }

    #[tokio::test]
    async fn set_get_and_refresh() {
        let store = InMemoryResultStore::new();
        store.set(TaskCategory::Fork, "a", record(1)).await.unwrap();
        store.set(TaskCategory::Fork, "a", record(2)).await.unwrap();

        let found = store.get(TaskCategory::Fork, "a").await.unwrap().unwrap();
        assert_eq!(found.event_count, 2);
        assert!(store.get(TaskCategory::Stargazer, "a").await.unwrap().is_none());

        store.refresh().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn replace_round_trips_through_all() {
        let store = InMemoryResultStore::new();
        store.set(TaskCategory::Stargazer, "b", record(3)).await.unwrap();
        let snapshot = store.all().await.unwrap();

        let restored = InMemoryResultStore::new();
        restored.set(TaskCategory::Fork, "stale", record(0)).await.unwrap();
        restored.replace(snapshot.clone()).await.unwrap();

        assert_eq!(restored.all().await.unwrap(), snapshot);
        assert_eq!(restored.len(), 1);
    }
}

pub mod modules;
mod schema;
pub mod shared;

use modules::{
    enrichment::Enricher,
    inspection::InspectionService,
    processor::{LogNotifier, Notifier, ProcessorPorts, QueueProcessor},
    provider::{
        GeocodeApi, GithubApi, GithubClient, NominatimClient, ResultSubmitter,
        ResultsBackendClient,
    },
    results::{InMemoryResultStore, ResultStore},
    run::{
        HistoryStore, InMemoryHistoryStore, InMemoryRunStore, PgHistoryStore, PgRunStore,
        RunStore,
    },
    snapshot::{InMemorySnapshotStore, PgSnapshotStore, SnapshotStore},
};
use shared::errors::AppResult;
use shared::{AppConfig, Database};
use std::sync::Arc;

/// Storage adapters, Postgres-backed when `DATABASE_URL` is set.
///
/// Results always live in memory; the snapshot carries them across restarts.
#[derive(Clone)]
pub struct AppStores {
    pub run_store: Arc<dyn RunStore>,
    pub history: Arc<dyn HistoryStore>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub result_store: Arc<dyn ResultStore>,
    pub durable: bool,
}

impl AppStores {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        match &config.database_url {
            Some(url) => {
                let database = Database::connect(url)?;
                let applied = database.run_migrations()?;
                log_info!("Database ready ({} migrations applied)", applied);

                let pool = database.pool().clone();
                Ok(Self {
                    run_store: Arc::new(PgRunStore::new(pool.clone())),
                    history: Arc::new(PgHistoryStore::new(pool.clone())),
                    snapshots: Arc::new(PgSnapshotStore::new(pool)),
                    result_store: Arc::new(InMemoryResultStore::new()),
                    durable: true,
                })
            }
            None => {
                log_warn!("DATABASE_URL not set, run state will not survive a restart");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            run_store: Arc::new(InMemoryRunStore::new()),
            history: Arc::new(InMemoryHistoryStore::new()),
            snapshots: Arc::new(InMemorySnapshotStore::new()),
            result_store: Arc::new(InMemoryResultStore::new()),
            durable: false,
        }
    }
}

/// Fully wired processor and inspection entry point
pub struct AppServices {
    pub stores: AppStores,
    pub processor: QueueProcessor,
    pub inspection: InspectionService,
}

impl AppServices {
    /// Wire the HTTP adapters from configuration
    pub fn from_config(config: &AppConfig, stores: AppStores) -> AppResult<Self> {
        let github: Arc<dyn GithubApi> = Arc::new(GithubClient::new(config)?);
        let geocoder: Arc<dyn GeocodeApi> = Arc::new(NominatimClient::new(config)?);
        let submitter: Arc<dyn ResultSubmitter> = Arc::new(ResultsBackendClient::new(config)?);

        Ok(Self::assemble(
            config,
            stores,
            github,
            geocoder,
            submitter,
            Arc::new(LogNotifier),
        ))
    }

    /// Wire explicit collaborators; used by `from_config` and by tests
    pub fn assemble(
        config: &AppConfig,
        stores: AppStores,
        github: Arc<dyn GithubApi>,
        geocoder: Arc<dyn GeocodeApi>,
        submitter: Arc<dyn ResultSubmitter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let enricher = Arc::new(Enricher::new(
            Arc::clone(&github),
            geocoder,
            Arc::clone(&stores.result_store),
        ));

        let ports = ProcessorPorts {
            run_store: Arc::clone(&stores.run_store),
            result_store: Arc::clone(&stores.result_store),
            history: Arc::clone(&stores.history),
            snapshots: Arc::clone(&stores.snapshots),
            submitter,
            notifier,
        };
        let processor = QueueProcessor::new(ports, enricher, config.processor.clone());

        let inspection = InspectionService::new(
            github,
            processor.clone(),
            Arc::clone(&stores.run_store),
            Arc::clone(&stores.result_store),
        );

        Self {
            stores,
            processor,
            inspection,
        }
    }
}

/// Test harness wiring the real processor to in-memory stores and fakes
use super::fakes::{RecordingNotifier, RecordingSubmitter, ScriptedGeocoder, ScriptedGithub};
use forklens_lib::modules::backlog::Task;
use forklens_lib::modules::processor::QueueProcessor;
use forklens_lib::modules::provider::ResultSubmitter;
use forklens_lib::modules::results::InMemoryResultStore;
use forklens_lib::modules::run::{InMemoryHistoryStore, InMemoryRunStore, RunSettings};
use forklens_lib::modules::snapshot::InMemorySnapshotStore;
use forklens_lib::shared::AppConfig;
use forklens_lib::{AppServices, AppStores};
use std::sync::Arc;

pub const REPOSITORY: &str = "octo-org/octo-repo";

pub struct TestServices {
    pub services: AppServices,
    pub github: Arc<ScriptedGithub>,
    pub geocoder: Arc<ScriptedGeocoder>,
    pub notifier: Arc<RecordingNotifier>,
    pub run_store: Arc<InMemoryRunStore>,
    pub history: Arc<InMemoryHistoryStore>,
    pub snapshots: Arc<InMemorySnapshotStore>,
    pub results: Arc<InMemoryResultStore>,
}

impl TestServices {
    pub fn processor(&self) -> &QueueProcessor {
        &self.services.processor
    }
}

/// Builder so each test only states what differs from the default wiring
pub struct TestServicesBuilder {
    github: Arc<ScriptedGithub>,
    geocoder: Arc<ScriptedGeocoder>,
    submitter: Arc<dyn ResultSubmitter>,
    run_store: Arc<InMemoryRunStore>,
    snapshots: Arc<InMemorySnapshotStore>,
}

impl Default for TestServicesBuilder {
    fn default() -> Self {
        Self {
            github: Arc::new(ScriptedGithub::new()),
            geocoder: Arc::new(ScriptedGeocoder::new()),
            submitter: Arc::new(RecordingSubmitter::accepting()),
            run_store: Arc::new(InMemoryRunStore::new()),
            snapshots: Arc::new(InMemorySnapshotStore::new()),
        }
    }
}

impl TestServicesBuilder {
    pub fn github(mut self, github: Arc<ScriptedGithub>) -> Self {
        self.github = github;
        self
    }

    pub fn geocoder(mut self, geocoder: Arc<ScriptedGeocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn submitter(mut self, submitter: Arc<dyn ResultSubmitter>) -> Self {
        self.submitter = submitter;
        self
    }

    /// Share durable stores with a previous "process"
    pub fn run_store(mut self, run_store: Arc<InMemoryRunStore>) -> Self {
        self.run_store = run_store;
        self
    }

    pub fn snapshots(mut self, snapshots: Arc<InMemorySnapshotStore>) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn build(self) -> TestServices {
        let config = test_config();
        let history = Arc::new(InMemoryHistoryStore::new());
        let results = Arc::new(InMemoryResultStore::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let stores = AppStores {
            run_store: self.run_store.clone(),
            history: history.clone(),
            snapshots: self.snapshots.clone(),
            result_store: results.clone(),
            durable: true,
        };
        let services = AppServices::assemble(
            &config,
            stores,
            self.github.clone(),
            self.geocoder.clone(),
            self.submitter,
            notifier.clone(),
        );

        TestServices {
            services,
            github: self.github,
            geocoder: self.geocoder,
            notifier,
            run_store: self.run_store,
            history,
            snapshots: self.snapshots,
            results,
        }
    }
}

pub fn build_test_services() -> TestServices {
    TestServicesBuilder::default().build()
}

/// Defaults: 300ms / 1000ms pacing and a 10s grace period. Tests run on
/// paused time, so these cost nothing.
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "GITHUB_API_URL" => Some(super::factories::API.to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn settings() -> RunSettings {
    RunSettings::for_repository(REPOSITORY)
}

/// Enqueue tasks and start a run the way population does
pub async fn start_run(services: &TestServices, tasks: Vec<Task>, settings: RunSettings) {
    use forklens_lib::modules::processor::StartOutcome;

    services.processor().enqueue(tasks).await;
    let outcome = services.processor().start(settings).await.unwrap();
    assert_eq!(outcome, StartOutcome::Started);
}

/// In-process doubles for the remote collaborators
use super::factories::{self, SubjectFactory};
use async_trait::async_trait;
use forklens_lib::modules::processor::{NotificationKind, Notifier};
use forklens_lib::modules::provider::{
    ForkDto, GeocodeApi, GithubApi, GithubEvent, NominatimPlace, ResultPayload, ResultSubmitter,
    StargazerDto, SubjectData, SubmitReceipt,
};
use forklens_lib::modules::run::{InMemoryRunStore, RunProgress, RunState, RunStore};
use forklens_lib::shared::errors::{AppError, AppResult, FetchError, GeoFetchError, SubmitError};
use mockall::mock;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// GitHub double: any subject URL resolves to a generated user with five
/// recent events unless a response was scripted for it.
#[derive(Default)]
pub struct ScriptedGithub {
    subjects: Mutex<HashMap<String, Result<SubjectData, FetchError>>>,
    events: Mutex<HashMap<String, Result<Vec<GithubEvent>, FetchError>>>,
    fork_pages: Mutex<Vec<Vec<ForkDto>>>,
    stargazer_pages: Mutex<Vec<Vec<StargazerDto>>>,
    subject_calls: Mutex<Vec<String>>,
    listing_calls: Mutex<Vec<(String, u32)>>,
    listing_error: Mutex<Option<FetchError>>,
    latency: Option<Duration>,
}

impl ScriptedGithub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subject fetch sleeps this long first (virtual time in tests)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn subject(&self, url: &str, subject: SubjectData) {
        self.subjects.lock().unwrap().insert(url.to_string(), Ok(subject));
    }

    pub fn failing_subject(&self, url: &str, error: FetchError) {
        self.subjects.lock().unwrap().insert(url.to_string(), Err(error));
    }

    pub fn events(&self, url: &str, events: Vec<GithubEvent>) {
        self.events.lock().unwrap().insert(url.to_string(), Ok(events));
    }

    pub fn fork_pages(&self, pages: Vec<Vec<ForkDto>>) {
        *self.fork_pages.lock().unwrap() = pages;
    }

    pub fn stargazer_pages(&self, pages: Vec<Vec<StargazerDto>>) {
        *self.stargazer_pages.lock().unwrap() = pages;
    }

    /// Every listing page fails with `error`
    pub fn failing_listings(&self, error: FetchError) {
        *self.listing_error.lock().unwrap() = Some(error);
    }

    pub fn subject_calls(&self) -> Vec<String> {
        self.subject_calls.lock().unwrap().clone()
    }

    pub fn listing_calls(&self) -> Vec<(String, u32)> {
        self.listing_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GithubApi for ScriptedGithub {
    async fn fetch_subject(&self, url: &str) -> Result<SubjectData, FetchError> {
        self.subject_calls.lock().unwrap().push(url.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let scripted = self.subjects.lock().unwrap().get(url).cloned();
        scripted.unwrap_or_else(|| Ok(SubjectFactory::for_url(url).build()))
    }

    async fn fetch_events(&self, url: &str) -> Result<Vec<GithubEvent>, FetchError> {
        let scripted = self.events.lock().unwrap().get(url).cloned();
        scripted.unwrap_or_else(|| Ok(factories::events(5, 1)))
    }

    async fn list_forks(&self, repository: &str, page: u32) -> Result<Vec<ForkDto>, FetchError> {
        self.listing_calls
            .lock()
            .unwrap()
            .push((format!("{}/forks", repository), page));
        if let Some(error) = self.listing_error.lock().unwrap().clone() {
            return Err(error);
        }
        let pages = self.fork_pages.lock().unwrap();
        Ok(pages.get(page as usize - 1).cloned().unwrap_or_default())
    }

    async fn list_stargazers(
        &self,
        repository: &str,
        page: u32,
    ) -> Result<Vec<StargazerDto>, FetchError> {
        self.listing_calls
            .lock()
            .unwrap()
            .push((format!("{}/stargazers", repository), page));
        if let Some(error) = self.listing_error.lock().unwrap().clone() {
            return Err(error);
        }
        let pages = self.stargazer_pages.lock().unwrap();
        Ok(pages.get(page as usize - 1).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct ScriptedGeocoder {
    places: Mutex<HashMap<String, Result<Vec<NominatimPlace>, GeoFetchError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&self, location: &str, lat: &str, lon: &str, country: &str) {
        let place: NominatimPlace = serde_json::from_value(serde_json::json!({
            "lat": lat,
            "lon": lon,
            "display_name": format!("{}, {}", location, country),
            "address": { "country": country }
        }))
        .unwrap();
        self.places
            .lock()
            .unwrap()
            .insert(location.to_string(), Ok(vec![place]));
    }

    pub fn failing(&self, location: &str, error: GeoFetchError) {
        self.places
            .lock()
            .unwrap()
            .insert(location.to_string(), Err(error));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodeApi for ScriptedGeocoder {
    async fn geocode(&self, location: &str) -> Result<Vec<NominatimPlace>, GeoFetchError> {
        self.calls.lock().unwrap().push(location.to_string());
        let scripted = self.places.lock().unwrap().get(location).cloned();
        scripted.unwrap_or_else(|| Err(GeoFetchError::NoMatch(location.to_string())))
    }
}

/// Records every payload; answers with a fixed receipt or rejection
pub struct RecordingSubmitter {
    payloads: Mutex<Vec<ResultPayload>>,
    reject_with: Option<u16>,
}

impl RecordingSubmitter {
    pub fn accepting() -> Self {
        Self {
            payloads: Mutex::new(Vec::new()),
            reject_with: None,
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            payloads: Mutex::new(Vec::new()),
            reject_with: Some(status),
        }
    }

    pub fn payloads(&self) -> Vec<ResultPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSubmitter for RecordingSubmitter {
    async fn submit(&self, payload: &ResultPayload) -> Result<SubmitReceipt, SubmitError> {
        self.payloads.lock().unwrap().push(payload.clone());
        match self.reject_with {
            Some(status) => Err(SubmitError::Rejected {
                status,
                body: "backend unavailable".to_string(),
            }),
            None => Ok(SubmitReceipt {
                id: format!("result-{}", self.payloads.lock().unwrap().len()),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(NotificationKind, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.sent.lock().unwrap().push((kind, message.to_string()));
    }
}

mock! {
    pub Submitter {}

    #[async_trait]
    impl ResultSubmitter for Submitter {
        async fn submit(&self, payload: &ResultPayload) -> Result<SubmitReceipt, SubmitError>;
    }
}

/// Run store whose writes of a DONE or ERROR state fail; everything else
/// goes to the in-memory store underneath.
#[derive(Default)]
pub struct TerminalWriteFailingRunStore {
    inner: InMemoryRunStore,
}

#[async_trait]
impl RunStore for TerminalWriteFailingRunStore {
    async fn get(&self) -> AppResult<RunState> {
        self.inner.get().await
    }

    async fn set(&self, state: &RunState) -> AppResult<()> {
        if state.is_terminal() {
            return Err(AppError::DatabaseError("connection reset".to_string()));
        }
        self.inner.set(state).await
    }

    async fn reset(&self) -> AppResult<()> {
        self.inner.reset().await
    }

    async fn set_progress(&self, progress: RunProgress) -> AppResult<()> {
        self.inner.set_progress(progress).await
    }
}

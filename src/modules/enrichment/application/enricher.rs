use crate::modules::backlog::Task;
use crate::modules::enrichment::domain::flags::{derive_flags, Activity};
use crate::modules::enrichment::domain::geo::place_to_location;
use crate::modules::provider::{GeocodeApi, GithubApi};
use crate::modules::results::{EnrichedUser, GeoLocation, ResultStore};
use crate::shared::errors::{AppError, FetchError, GeoFetchError};
use crate::{log_debug, log_warn};
use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Why a single task was abandoned. The run itself continues.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to store result: {0}")]
    Store(#[from] AppError),
}

/// `https://api.github.com/users/x/events{/privacy}` -> `.../events`
fn expand_uri_template(url: &str) -> String {
    static TEMPLATE: OnceLock<Option<Regex>> = OnceLock::new();
    match TEMPLATE.get_or_init(|| Regex::new(r"\{[^}]*\}").ok()) {
        Some(template) => template.replace_all(url, "").into_owned(),
        None => url.to_string(),
    }
}

pub struct Enricher {
    github: Arc<dyn GithubApi>,
    geocoder: Arc<dyn GeocodeApi>,
    results: Arc<dyn ResultStore>,
}

impl Enricher {
    pub fn new(
        github: Arc<dyn GithubApi>,
        geocoder: Arc<dyn GeocodeApi>,
        results: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            github,
            geocoder,
            results,
        }
    }

    /// Fetch, derive, merge and store one subject. Overwrites an existing
    /// record for the same key.
    pub async fn process(&self, task: &Task, geocode_enabled: bool) -> Result<(), TaskError> {
        let record = self.enrich(task, geocode_enabled).await?;
        self.results
            .set(task.category, &task.subject_url, record)
            .await?;
        Ok(())
    }

    pub async fn enrich(
        &self,
        task: &Task,
        geocode_enabled: bool,
    ) -> Result<EnrichedUser, FetchError> {
        let subject = self.github.fetch_subject(&task.subject_url).await?;

        let events_url = match subject.events_url() {
            Some(url) => expand_uri_template(url),
            None => format!("{}/events", task.subject_url.trim_end_matches('/')),
        };
        let events = self.github.fetch_events(&events_url).await?;

        let activity = Activity::from_events(subject.followers(), &events);
        let flags = derive_flags(&activity, Utc::now());

        let geo = match (geocode_enabled, subject.location()) {
            (true, Some(location)) => self.locate(location).await,
            _ => None,
        };

        log_debug!(
            "Enriched {} ({}): {} events, real={}, active={}",
            subject.login().unwrap_or("<unknown>"),
            task.category,
            flags.event_count,
            flags.is_real_user,
            flags.is_active_user
        );

        Ok(EnrichedUser::merge(subject.into_inner(), flags, geo))
    }

    /// Best effort: a failure is logged and the record simply has no geo fields
    async fn locate(&self, location: &str) -> Option<GeoLocation> {
        match self.fetch_location(location).await {
            Ok(geo) => Some(geo),
            Err(e) => {
                log_warn!("Geocoding '{}' failed, continuing without it: {}", location, e);
                None
            }
        }
    }

    pub async fn fetch_location(&self, location: &str) -> Result<GeoLocation, GeoFetchError> {
        let places = self.geocoder.geocode(location).await?;
        place_to_location(location, &places)
    }
}

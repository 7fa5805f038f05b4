use super::dto::{
    ForkDto, GithubEvent, NominatimPlace, ResultPayload, StargazerDto, SubjectData, SubmitReceipt,
};
use crate::shared::errors::{FetchError, GeoFetchError, SubmitError};
use async_trait::async_trait;

/// GitHub REST access used by population and enrichment
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// `GET <subject url>`; the raw user object
    async fn fetch_subject(&self, url: &str) -> Result<SubjectData, FetchError>;

    /// `GET <events url>`; most recent public events first
    async fn fetch_events(&self, url: &str) -> Result<Vec<GithubEvent>, FetchError>;

    /// One page of `/repos/{repository}/forks`, 1-based
    async fn list_forks(&self, repository: &str, page: u32) -> Result<Vec<ForkDto>, FetchError>;

    /// One page of `/repos/{repository}/stargazers`, 1-based
    async fn list_stargazers(
        &self,
        repository: &str,
        page: u32,
    ) -> Result<Vec<StargazerDto>, FetchError>;
}

#[async_trait]
pub trait GeocodeApi: Send + Sync {
    /// Candidate places for a free-form location, best match first
    async fn geocode(&self, location: &str) -> Result<Vec<NominatimPlace>, GeoFetchError>;
}

/// Backend that packages and delivers the final result
#[async_trait]
pub trait ResultSubmitter: Send + Sync {
    async fn submit(&self, payload: &ResultPayload) -> Result<SubmitReceipt, SubmitError>;
}

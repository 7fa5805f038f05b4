use super::http_client::RateLimitClient;
use crate::modules::provider::dto::{ForkDto, GithubEvent, StargazerDto, SubjectData};
use crate::modules::provider::traits::GithubApi;
use crate::shared::config::AppConfig;
use crate::shared::errors::{AppResult, FetchError};
use crate::shared::utils::RateLimiter;
use async_trait::async_trait;

pub const PAGE_SIZE: u32 = 100;

pub struct GithubClient {
    http: RateLimitClient,
    base_url: String,
}

impl GithubClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        // Bursts stay small: overlapping enrichments share this limiter
        let limiter = RateLimiter::new(config.github_requests_per_second, 10)?;
        let http = RateLimitClient::new(
            "GitHub",
            &config.user_agent,
            limiter,
            config.github_token.clone(),
        )?;

        Ok(Self {
            http,
            base_url: config.github_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn listing_url(&self, repository: &str, listing: &str) -> String {
        format!("{}/repos/{}/{}", self.base_url, repository, listing)
    }

    fn page_query(page: u32) -> [(&'static str, String); 2] {
        [("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())]
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn fetch_subject(&self, url: &str) -> Result<SubjectData, FetchError> {
        self.http.get_json(url, &[]).await
    }

    async fn fetch_events(&self, url: &str) -> Result<Vec<GithubEvent>, FetchError> {
        self.http
            .get_json(url, &[("per_page", PAGE_SIZE.to_string())])
            .await
    }

    async fn list_forks(&self, repository: &str, page: u32) -> Result<Vec<ForkDto>, FetchError> {
        let url = self.listing_url(repository, "forks");
        self.http.get_json(&url, &Self::page_query(page)).await
    }

    async fn list_stargazers(
        &self,
        repository: &str,
        page: u32,
    ) -> Result<Vec<StargazerDto>, FetchError> {
        let url = self.listing_url(repository, "stargazers");
        self.http.get_json(&url, &Self::page_query(page)).await
    }
}

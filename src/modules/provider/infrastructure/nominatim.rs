use super::http_client::RateLimitClient;
use crate::modules::provider::dto::NominatimPlace;
use crate::modules::provider::traits::GeocodeApi;
use crate::shared::config::AppConfig;
use crate::shared::errors::{AppResult, GeoFetchError};
use crate::shared::utils::RateLimiter;
use async_trait::async_trait;

/// Longer inputs are profile bios pasted into the location field
const MAX_LOCATION_LEN: usize = 200;

pub struct NominatimClient {
    http: RateLimitClient,
    search_url: String,
}

impl NominatimClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let limiter = RateLimiter::new(config.geocode_requests_per_second, 1)?;
        let http = RateLimitClient::new("Nominatim", &config.user_agent, limiter, None)?;

        Ok(Self {
            http,
            search_url: config.geocode_url.clone(),
        })
    }
}

#[async_trait]
impl GeocodeApi for NominatimClient {
    async fn geocode(&self, location: &str) -> Result<Vec<NominatimPlace>, GeoFetchError> {
        let location = location.trim();
        if location.is_empty() || location.len() > MAX_LOCATION_LEN {
            return Err(GeoFetchError::NoMatch(location.to_string()));
        }

        let query = [
            ("q", location.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", "1".to_string()),
        ];

        Ok(self.http.get_json(&self.search_url, &query).await?)
    }
}

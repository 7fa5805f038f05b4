//! Environment-driven configuration
//!
//! Values are read once at startup after `.env` is loaded. Everything except
//! the results endpoint has a default so a local run needs no setup.

use crate::shared::errors::{AppError, AppResult};
use std::time::Duration;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "forklens/0.1 (+https://github.com/forklens/forklens)";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Enables the Postgres adapters when present
    pub database_url: Option<String>,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub geocode_url: String,
    pub results_url: Option<String>,
    pub user_agent: String,
    pub github_requests_per_second: f64,
    pub geocode_requests_per_second: f64,
    pub processor: ProcessorConfig,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let github_requests_per_second = match non_empty("FORKLENS_GITHUB_RPS") {
            Some(raw) => raw.parse::<f64>().map_err(|e| {
                AppError::ConfigError(format!("FORKLENS_GITHUB_RPS is not a number: {}", e))
            })?,
            None => 10.0,
        };

        let mut processor = ProcessorConfig::default();
        if let Some(raw) = non_empty("FORKLENS_GRACE_PERIOD_SECS") {
            let secs = raw.parse::<u64>().map_err(|e| {
                AppError::ConfigError(format!("FORKLENS_GRACE_PERIOD_SECS is invalid: {}", e))
            })?;
            processor.grace_period = Duration::from_secs(secs);
        }

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            github_token: non_empty("GITHUB_TOKEN"),
            github_api_url: non_empty("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            geocode_url: non_empty("GEOCODE_URL").unwrap_or_else(|| DEFAULT_GEOCODE_URL.to_string()),
            results_url: non_empty("RESULTS_URL"),
            user_agent: non_empty("FORKLENS_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            github_requests_per_second,
            // Nominatim usage policy: at most one request per second
            geocode_requests_per_second: 1.0,
            processor,
        })
    }

    pub fn require_results_url(&self) -> AppResult<&str> {
        self.results_url
            .as_deref()
            .ok_or_else(|| AppError::ConfigError("RESULTS_URL must be set".to_string()))
    }
}

/// Pacing and persistence cadence of the queue processor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorConfig {
    /// Tick interval without geocoding
    pub short_interval: Duration,
    /// Tick interval when geocoding is enabled (stricter third-party limit)
    pub long_interval: Duration,
    /// Wait after the backlog drains before finalizing
    pub grace_period: Duration,
    /// Progress record is written when the remaining length is a multiple of this
    pub progress_every: usize,
    /// Full snapshot is written when the remaining length is a multiple of this
    pub snapshot_every: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            short_interval: Duration::from_millis(300),
            long_interval: Duration::from_millis(1000),
            grace_period: Duration::from_secs(10),
            progress_every: 5,
            snapshot_every: 100,
        }
    }
}

impl ProcessorConfig {
    pub fn pacing_interval(&self, geocode_enabled: bool) -> Duration {
        if geocode_enabled {
            self.long_interval
        } else {
            self.short_interval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.geocode_url, DEFAULT_GEOCODE_URL);
        assert!(config.database_url.is_none());
        assert!(config.require_results_url().is_err());
        assert_eq!(config.processor, ProcessorConfig::default());
    }

    #[test]
    fn blank_values_are_treated_as_missing() {
        let config = AppConfig::from_lookup(lookup(&[("GITHUB_TOKEN", "  ")])).unwrap();
        assert!(config.github_token.is_none());
    }

    #[test]
    fn invalid_numbers_are_config_errors() {
        let err = AppConfig::from_lookup(lookup(&[("FORKLENS_GITHUB_RPS", "fast")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn pacing_uses_long_interval_for_geocoding() {
        let config = ProcessorConfig::default();
        assert_eq!(config.pacing_interval(true), Duration::from_millis(1000));
        assert_eq!(config.pacing_interval(false), Duration::from_millis(300));
    }
}

use super::http_client::RateLimitClient;
use crate::modules::provider::dto::{ResultPayload, SubmitReceipt};
use crate::modules::provider::traits::ResultSubmitter;
use crate::shared::config::AppConfig;
use crate::shared::errors::{AppResult, SubmitError};
use crate::shared::utils::RateLimiter;
use async_trait::async_trait;

/// Posts the finished run to the packaging backend
pub struct ResultsBackendClient {
    http: RateLimitClient,
    endpoint: String,
}

impl ResultsBackendClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let endpoint = config.require_results_url()?.to_string();
        let limiter = RateLimiter::new(1.0, 1)?;
        let http = RateLimitClient::new(
            "ResultsBackend",
            &config.user_agent,
            limiter,
            None,
        )?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl ResultSubmitter for ResultsBackendClient {
    async fn submit(&self, payload: &ResultPayload) -> Result<SubmitReceipt, SubmitError> {
        let response = self
            .http
            .post_json(&self.endpoint, payload)
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        serde_json::from_str::<SubmitReceipt>(&body)
            .map_err(|e| SubmitError::InvalidResponse(format!("{}: {}", e, truncate(&body, 200))))
    }
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() > max {
        let cut = (0..=max).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

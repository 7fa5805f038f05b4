//! JSON HTTP client with per-service rate limiting
//!
//! Every outbound request waits on the service's limiter first. Failures are
//! classified into `FetchError` and returned; there are no retries.

use super::rate_limit_info::RateLimitInfo;
use crate::shared::errors::{AppError, AppResult, FetchError};
use crate::shared::utils::logger::LogContext;
use crate::shared::utils::RateLimiter;
use crate::log_debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

pub struct RateLimitClient {
    client: Client,
    rate_limiter: RateLimiter,
    service_name: String,
    bearer_token: Option<String>,
}

impl RateLimitClient {
    pub fn new(
        service_name: &str,
        user_agent: &str,
        rate_limiter: RateLimiter,
        bearer_token: Option<String>,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter,
            service_name: service_name.to_string(),
            bearer_token,
        })
    }

    /// `GET url?query` decoded as JSON
    pub async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = self.send(url, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }

    /// `POST url` with a JSON body. The response comes back whatever its
    /// status; callers with their own error mapping classify it.
    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<Response, reqwest::Error>
    where
        B: Serialize + ?Sized,
    {
        self.acquire().await;

        let started = Instant::now();
        LogContext::api_call(&self.service_name, url, "start", None);
        let response = self.client.post(url).json(body).send().await?;
        LogContext::api_call(
            &self.service_name,
            url,
            response.status().as_str(),
            Some(started.elapsed().as_millis() as u64),
        );
        Ok(response)
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn acquire(&self) {
        if !self.rate_limiter.try_acquire() {
            log_debug!("{} throttled, waiting for a request slot", self.service_name);
            self.rate_limiter.wait().await;
        }
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, FetchError> {
        self.acquire().await;

        let started = Instant::now();
        LogContext::api_call(&self.service_name, url, "start", None);

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        let status = response.status();
        LogContext::api_call(
            &self.service_name,
            url,
            status.as_str(),
            Some(started.elapsed().as_millis() as u64),
        );

        if status.is_success() {
            return Ok(response);
        }

        let info = RateLimitInfo::from_headers(response.headers());
        Err(classify_status(url, status, &info))
    }
}

fn classify_status(url: &str, status: StatusCode, info: &RateLimitInfo) -> FetchError {
    let limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && info.is_exhausted());

    if limited {
        return FetchError::RateLimit {
            url: url.to_string(),
            retry_after: info.recommended_delay().map_or(0, |d| d.as_secs()),
        };
    }

    if status == StatusCode::NOT_FOUND {
        return FetchError::NotFound {
            url: url.to_string(),
        };
    }

    FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_limits_and_missing_resources() {
        let exhausted = RateLimitInfo {
            remaining: Some(0),
            retry_after: Some(Duration::from_secs(60)),
            ..Default::default()
        };

        assert_eq!(
            classify_status("u", StatusCode::FORBIDDEN, &exhausted),
            FetchError::RateLimit {
                url: "u".to_string(),
                retry_after: 60
            }
        );
        assert_eq!(
            classify_status("u", StatusCode::FORBIDDEN, &RateLimitInfo::default()),
            FetchError::Status {
                url: "u".to_string(),
                status: 403
            }
        );
        assert!(matches!(
            classify_status("u", StatusCode::NOT_FOUND, &RateLimitInfo::default()),
            FetchError::NotFound { .. }
        ));
    }

    #[test]
    fn test_client_creation() {
        let limiter = RateLimiter::new(1.0, 1).unwrap();
        let client = RateLimitClient::new("GitHub", "forklens-test", limiter, None).unwrap();
        assert_eq!(client.service_name(), "GitHub");
    }
}

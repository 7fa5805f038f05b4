//! Rate limit headers of GitHub and Nominatim responses
//!
//! Used only to describe a limit hit in the returned error. Nothing here
//! retries; a limited request fails its task.

use std::time::Duration;

/// Information extracted from limited responses
#[derive(Debug, Clone, Default)]
pub struct RateLimitInfo {
    /// From the Retry-After header
    pub retry_after: Option<Duration>,
    /// Time until the window resets (from X-RateLimit-Reset)
    pub reset_time: Option<Duration>,
    /// From X-RateLimit-Remaining
    pub remaining: Option<u32>,
}

impl RateLimitInfo {
    /// Parse rate limit information from HTTP response headers
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let header_u64 = |name: &str| {
            headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
        };

        let retry_after = header_u64("retry-after").map(Duration::from_secs);

        let reset_time = header_u64("x-ratelimit-reset").map(|timestamp| {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            Duration::from_secs(timestamp.saturating_sub(now))
        });

        let remaining = header_u64("x-ratelimit-remaining").map(|n| n.min(u32::MAX as u64) as u32);

        Self {
            retry_after,
            reset_time,
            remaining,
        }
    }

    /// GitHub signals an exhausted primary limit with 403 and zero remaining
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Get the best delay recommendation from available information
    pub fn recommended_delay(&self) -> Option<Duration> {
        self.retry_after.or(self.reset_time)
    }
}

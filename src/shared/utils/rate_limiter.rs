use crate::shared::errors::AppError;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

type DirectLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Per-service request limiter shared by all in-flight enrichment tasks.
///
/// Tick pacing bounds how fast tasks are dispatched; this bounds how fast
/// requests actually leave the process when dispatched tasks overlap.
pub struct RateLimiter {
    limiter: DirectLimiter,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64, burst_size: u32) -> Result<Self, AppError> {
        if !(requests_per_second > 0.0) {
            return Err(AppError::ConfigError(format!(
                "Rate limit must be positive, got {}",
                requests_per_second
            )));
        }

        let period = Duration::from_secs_f64(1.0 / requests_per_second);
        let burst = NonZeroU32::new(burst_size.max(1)).ok_or_else(|| {
            AppError::ConfigError("Burst size must be at least 1".to_string())
        })?;
        let quota = Quota::with_period(period)
            .ok_or_else(|| AppError::ConfigError("Rate limit period is zero".to_string()))?
            .allow_burst(burst);

        Ok(Self {
            limiter: GovernorRateLimiter::direct(quota),
        })
    }

    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a slot if one is free right now, without waiting
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_consumed_then_limited() {
        let limiter = RateLimiter::new(1.0, 2).unwrap();
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn rejects_non_positive_rate() {
        assert!(RateLimiter::new(0.0, 1).is_err());
        assert!(RateLimiter::new(-2.0, 1).is_err());
    }
}

//! Fixed-window send limiter.
//!
//! Admission and counting are separate steps: `check` runs before validation, and
//! `record_attempt` runs after the transport has been called. Concurrent requests can
//! therefore overshoot the limit by a few sends within one window.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::Settings;
use crate::store::{KeyValueStore, RATE_WINDOW_KEY};

pub const RATE_WINDOW: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Sends counted in the current window; 0 when no window is open.
    pub async fn current_count(&self) -> Result<u64> {
        let count = self
            .store
            .get(RATE_WINDOW_KEY)
            .await?
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Ok(count)
    }

    /// Reject when the current window already holds the configured number of sends.
    pub async fn check(&self, settings: &Settings) -> Result<()> {
        let limit = settings.effective_rate_limit();
        let count = self.current_count().await?;

        if count >= u64::from(limit) {
            tracing::warn!(count, limit, "Rate limit exceeded");
            return Err(AppError::RateLimited { limit });
        }
        Ok(())
    }

    /// Count one send attempt, opening a new 60-second window if none is active.
    pub async fn record_attempt(&self) -> Result<u64> {
        let count = self.store.increment(RATE_WINDOW_KEY, RATE_WINDOW).await?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn limiter() -> RateLimiter {
        RateLimiter::new(Arc::new(MemoryStore::new()))
    }

    fn settings(limit: u32) -> Settings {
        Settings {
            rate_limit_per_minute: limit,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_admits_until_limit_reached() {
        let limiter = limiter();
        let settings = settings(2);

        for _ in 0..2 {
            limiter.check(&settings).await.unwrap();
            limiter.record_attempt().await.unwrap();
        }

        let err = limiter.check(&settings).await.unwrap_err();
        assert_eq!(err.code(), "rate_limit_exceeded");
        assert!(err.to_string().contains('2'));
    }

    #[tokio::test]
    async fn test_check_does_not_count() {
        let limiter = limiter();
        let settings = settings(1);

        for _ in 0..5 {
            limiter.check(&settings).await.unwrap();
        }
        assert_eq!(limiter.current_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_limit_treated_as_default() {
        let limiter = limiter();
        let settings = settings(0);

        for _ in 0..9 {
            limiter.record_attempt().await.unwrap();
        }
        limiter.check(&settings).await.unwrap();

        limiter.record_attempt().await.unwrap();
        assert!(limiter.check(&settings).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_after_sixty_seconds() {
        let limiter = limiter();
        let settings = settings(1);

        limiter.record_attempt().await.unwrap();
        assert!(limiter.check(&settings).await.is_err());

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(limiter.check(&settings).await.is_err());

        tokio::time::advance(Duration::from_secs(1)).await;
        limiter.check(&settings).await.unwrap();
        assert_eq!(limiter.record_attempt().await.unwrap(), 1);
    }
}

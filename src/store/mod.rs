//! Key-value persistence for settings, the email log and the rate window.

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::{create_pool, RedisStore};

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub const SETTINGS_KEY: &str = "mailer:settings";
pub const EMAIL_LOG_KEY: &str = "mailer:email_log";
pub const RATE_WINDOW_KEY: &str = "mailer:rate:send_email";

/// Generic string store with optional per-key expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value`, replacing any previous value and expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Add one to the integer at `key` and return the new value.
    ///
    /// An absent or expired key starts at 1 and expires after `ttl`; later increments
    /// keep the expiry set by the first increment.
    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64>;

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config as RedisConfig, Pool, Runtime};
use redis::AsyncCommands;

use super::KeyValueStore;
use crate::error::{AppError, Result};

/// Create a Redis connection pool
pub fn create_pool(redis_url: &str) -> Result<Pool> {
    let redis_config = RedisConfig::from_url(redis_url);
    let pool = redis_config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| AppError::Store(format!("Failed to create Redis pool: {}", e)))?;

    Ok(pool)
}

/// Key-value store backed by Redis strings.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Redis expiries have whole-second resolution; never round down to "no expiry".
fn ttl_seconds(ttl: Duration) -> i64 {
    ttl.as_secs().max(1) as i64
}

/// `INCR` and `EXPIRE .. NX` in one MULTI/EXEC, so a counter never outlives its window
/// without an expiry.
fn increment_pipeline(key: &str, ttl: Duration) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .incr(key, 1)
        .cmd("EXPIRE")
        .arg(key)
        .arg(ttl_seconds(ttl))
        .arg("NX")
        .ignore();
    pipe
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.pool.get().await?;

        match ttl {
            Some(ttl) => {
                redis::cmd("SETEX")
                    .arg(key)
                    .arg(ttl_seconds(ttl))
                    .arg(value)
                    .query_async::<()>(&mut *conn)
                    .await?
            }
            None => {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .query_async::<()>(&mut *conn)
                    .await?
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.pool.get().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn increment(&self, key: &str, ttl: Duration) -> Result<i64> {
        let mut conn = self.pool.get().await?;

        let (count,): (i64,) = increment_pipeline(key, ttl)
            .query_async(&mut *conn)
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.pool.get().await?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(pong == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_never_rounds_to_zero() {
        assert_eq!(ttl_seconds(Duration::from_millis(200)), 1);
        assert_eq!(ttl_seconds(Duration::from_secs(60)), 60);
    }

    #[test]
    fn test_increment_sets_expiry_in_same_transaction() {
        let packed = increment_pipeline("mailer:rate:send_email", Duration::from_secs(60))
            .get_packed_pipeline();
        let packed = String::from_utf8_lossy(&packed);

        let position = |needle: &str| {
            packed
                .find(needle)
                .unwrap_or_else(|| panic!("{} missing from {:?}", needle, packed))
        };
        assert!(position("MULTI") < position("INCR"));
        assert!(position("INCR") < position("EXPIRE"));
        assert!(position("EXPIRE") < position("NX"));
        assert!(position("NX") < position("EXEC"));
    }
}

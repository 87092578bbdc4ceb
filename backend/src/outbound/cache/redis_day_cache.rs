//! `DayCache` adapter over a bb8 pool of Redis connections.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::{self, RedisError};
use tracing::debug;

use super::CacheKeyTemplate;
use crate::domain::TaskRecord;
use crate::domain::ports::{DayCache, DayCacheError};

/// Connection pool for the cache store.
pub type RedisPool = Pool<RedisConnectionManager>;

/// Day cache storing each bucket as a JSON array string with an expiry.
#[derive(Clone)]
pub struct RedisDayCache {
    pool: RedisPool,
    keys: CacheKeyTemplate,
    ttl: Duration,
}

impl RedisDayCache {
    pub fn new(pool: RedisPool, keys: CacheKeyTemplate, ttl: Duration) -> Self {
        Self { pool, keys, ttl }
    }

    /// Build a pool for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DayCacheError::Backend`] when the URL is invalid or the
    /// initial connection fails.
    pub async fn connect(url: &str) -> Result<RedisPool, DayCacheError> {
        let manager = RedisConnectionManager::new(url).map_err(backend_error)?;
        Pool::builder()
            .build(manager)
            .await
            .map_err(backend_error)
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, DayCacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| DayCacheError::backend(err.to_string()))
    }

    fn ttl_seconds(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }
}

fn backend_error(err: RedisError) -> DayCacheError {
    DayCacheError::backend(err.to_string())
}

fn decode_bucket(raw: &str) -> Result<Vec<TaskRecord>, DayCacheError> {
    serde_json::from_str(raw).map_err(|err| DayCacheError::serialization(err.to_string()))
}

fn encode_bucket(rows: &[TaskRecord]) -> Result<String, DayCacheError> {
    serde_json::to_string(rows).map_err(|err| DayCacheError::serialization(err.to_string()))
}

#[async_trait]
impl DayCache for RedisDayCache {
    async fn get(&self, day: u32) -> Result<Option<Vec<TaskRecord>>, DayCacheError> {
        let key = self.keys.key_for(day);
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        debug!(%key, hit = raw.is_some(), "day cache lookup");
        raw.as_deref().map(decode_bucket).transpose()
    }

    async fn put(&self, day: u32, rows: &[TaskRecord]) -> Result<(), DayCacheError> {
        let key = self.keys.key_for(day);
        let payload = encode_bucket(rows)?;
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_seconds())
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        debug!(%key, rows = rows.len(), "day cache bucket stored");
        Ok(())
    }

    async fn cached_days(&self) -> Result<Vec<u32>, DayCacheError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(self.keys.pattern())
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        let mut days: Vec<u32> = keys.iter().filter_map(|key| self.keys.day_of(key)).collect();
        days.sort_unstable();
        days.dedup();
        Ok(days)
    }
}

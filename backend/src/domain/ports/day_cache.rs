//! Port for the per-day task cache.
use async_trait::async_trait;

use crate::domain::TaskRecord;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by day cache adapters.
    pub enum DayCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "day cache backend failure: {message}",
        /// Serialisation or deserialisation of a cached bucket failed.
        Serialization { message: String } => "day cache serialisation failed: {message}",
    }
}

/// Key/value store of task rows partitioned by day.
///
/// A miss is `Ok(None)`, never an error. A stored empty bucket is a hit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DayCache: Send + Sync {
    /// Read the bucket for `day`.
    async fn get(&self, day: u32) -> Result<Option<Vec<TaskRecord>>, DayCacheError>;

    /// Replace the bucket for `day`, applying the configured expiry.
    async fn put(&self, day: u32, rows: &[TaskRecord]) -> Result<(), DayCacheError>;

    /// Days that currently hold a bucket, ascending.
    async fn cached_days(&self) -> Result<Vec<u32>, DayCacheError>;
}

/// Cache used when no backing store is configured. Every read misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDayCache;

#[async_trait]
impl DayCache for FixtureDayCache {
    async fn get(&self, _day: u32) -> Result<Option<Vec<TaskRecord>>, DayCacheError> {
        Ok(None)
    }

    async fn put(&self, _day: u32, _rows: &[TaskRecord]) -> Result<(), DayCacheError> {
        Ok(())
    }

    async fn cached_days(&self) -> Result<Vec<u32>, DayCacheError> {
        Ok(Vec::new())
    }
}

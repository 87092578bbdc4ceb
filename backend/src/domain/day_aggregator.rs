//! All-or-nothing reads over the day cache.
//!
//! Cache faults never reach callers: a failed read is a miss, a failed write
//! is dropped, and a failed enumeration is an empty day set. Each is logged
//! at `warn`.

use std::sync::Arc;

use tracing::{debug, warn};

use super::ports::DayCache;
use super::{TaskDay, TaskRecord};

/// Degrading wrapper around a [`DayCache`] that assembles day ranges.
#[derive(Clone)]
pub struct DayAggregator {
    cache: Arc<dyn DayCache>,
}

impl DayAggregator {
    pub fn new(cache: Arc<dyn DayCache>) -> Self {
        Self { cache }
    }

    /// Bucket for `day`, or `None` on a miss or cache fault.
    pub async fn get(&self, day: u32) -> Option<Vec<TaskRecord>> {
        match self.cache.get(day).await {
            Ok(bucket) => bucket,
            Err(error) => {
                warn!(day, %error, "day cache read failed; treating as miss");
                None
            }
        }
    }

    /// Store the bucket for `day`. Failures are logged and dropped.
    pub async fn put(&self, day: u32, rows: &[TaskRecord]) {
        if let Err(error) = self.cache.put(day, rows).await {
            warn!(day, %error, "day cache write failed");
        }
    }

    /// Currently cached days, ascending. Empty on a cache fault.
    pub async fn cached_days(&self) -> Vec<u32> {
        match self.cache.cached_days().await {
            Ok(mut days) => {
                days.sort_unstable();
                days.dedup();
                days
            }
            Err(error) => {
                warn!(%error, "day cache enumeration failed");
                Vec::new()
            }
        }
    }

    /// Concatenate buckets for days `1..=max_day`, or for every cached day
    /// when no bound is given.
    ///
    /// Returns `None` when any day in range is missing, the range is empty,
    /// or every bucket is empty. Partial results are never returned.
    pub async fn accumulate(&self, max_day: Option<TaskDay>) -> Option<Vec<TaskRecord>> {
        let days: Vec<u32> = match max_day {
            Some(day) => (TaskDay::MIN..=day.get()).collect(),
            None => self.cached_days().await,
        };
        if days.is_empty() {
            return None;
        }

        let mut rows = Vec::new();
        for day in days {
            let Some(bucket) = self.get(day).await else {
                debug!(day, "day bucket missing; abandoning cached read");
                return None;
            };
            rows.extend(bucket);
        }

        (!rows.is_empty()).then_some(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{DayCacheError, MockDayCache};
    use rstest::rstest;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn row(id: i64, day: u32) -> TaskRecord {
        match json!({"№": id, "Номер дня": day}) {
            serde_json::Value::Object(map) => TaskRecord::new(map),
            _ => unreachable!("literal is an object"),
        }
    }

    fn cache_with(buckets: BTreeMap<u32, Vec<TaskRecord>>) -> MockDayCache {
        let mut cache = MockDayCache::new();
        let reads = buckets.clone();
        cache
            .expect_get()
            .returning(move |day| Ok(reads.get(&day).cloned()));
        cache
            .expect_cached_days()
            .returning(move || Ok(buckets.keys().rev().copied().collect()));
        cache
    }

    fn aggregator(cache: MockDayCache) -> DayAggregator {
        DayAggregator::new(Arc::new(cache))
    }

    fn full_cache() -> BTreeMap<u32, Vec<TaskRecord>> {
        BTreeMap::from([
            (1, vec![row(1, 1), row(2, 1)]),
            (2, vec![row(3, 2)]),
            (3, vec![row(4, 3)]),
        ])
    }

    #[rstest]
    #[case(1, vec![1, 2])]
    #[case(2, vec![1, 2, 3])]
    #[case(3, vec![1, 2, 3, 4])]
    #[tokio::test]
    async fn concatenates_buckets_in_day_order(#[case] max_day: i64, #[case] ids: Vec<i64>) {
        let aggregator = aggregator(cache_with(full_cache()));
        let rows = aggregator
            .accumulate(TaskDay::new(max_day).ok())
            .await
            .expect("all buckets present");

        let layout = crate::domain::SheetLayout::default();
        let seen: Vec<i64> = rows.iter().filter_map(|r| r.id(&layout)).collect();
        assert_eq!(seen, ids);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[tokio::test]
    async fn any_missing_day_yields_none(#[case] missing: u32) {
        let mut buckets = full_cache();
        buckets.remove(&missing);
        let aggregator = aggregator(cache_with(buckets));

        assert!(aggregator.accumulate(TaskDay::new(3).ok()).await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn unbounded_uses_cached_day_set() {
        let aggregator = aggregator(cache_with(BTreeMap::from([(2, vec![row(3, 2)])])));
        let rows = aggregator.accumulate(None).await.expect("day 2 cached");
        assert_eq!(rows, vec![row(3, 2)]);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_cache_or_empty_buckets_yield_none() {
        assert!(aggregator(cache_with(BTreeMap::new())).accumulate(None).await.is_none());

        let empties = BTreeMap::from([(1, Vec::new()), (2, Vec::new())]);
        let aggregator = aggregator(cache_with(empties));
        assert!(aggregator.accumulate(TaskDay::new(2).ok()).await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn read_failure_is_a_miss() {
        let mut cache = MockDayCache::new();
        cache
            .expect_get()
            .returning(|_| Err(DayCacheError::serialization("bad json")));
        assert!(aggregator(cache).accumulate(TaskDay::new(1).ok()).await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn enumeration_failure_is_empty() {
        let mut cache = MockDayCache::new();
        cache
            .expect_cached_days()
            .returning(|| Err(DayCacheError::backend("connection reset")));
        cache.expect_get().never();
        assert!(aggregator(cache).accumulate(None).await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn write_failure_is_swallowed() {
        let mut cache = MockDayCache::new();
        cache
            .expect_put()
            .times(1)
            .returning(|_, _| Err(DayCacheError::backend("read only replica")));
        aggregator(cache).put(1, &[row(1, 1)]).await;
    }
}

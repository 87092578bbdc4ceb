//! Redis-backed day cache.
//!
//! Buckets are JSON arrays stored under keys built from a template such as
//! `tasks:day:{day}`, written with `SET ... EX`.

mod key_template;
mod redis_day_cache;

pub use key_template::{CacheKeyTemplate, CacheKeyTemplateError};
pub use redis_day_cache::{RedisDayCache, RedisPool};

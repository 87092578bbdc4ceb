//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Adapters run on `diesel-async` connections from a `bb8` pool and map
//! database failures to the port error types. Row shapes and the schema stay
//! private to this module.
//!
//! # Example
//!
//! ```ignore
//! use tasks_backend::outbound::persistence::{DbPool, DieselUserRegistry, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/playit")).await?;
//! let registry = DieselUserRegistry::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_user_registry;
mod pool;
mod schema;

pub use diesel_user_registry::DieselUserRegistry;
pub use pool::{DbPool, PoolConfig, PoolError};

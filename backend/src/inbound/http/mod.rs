//! HTTP inbound adapter exposing the task board REST endpoints.

pub mod credential;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod tasks;

pub use error::ApiResult;

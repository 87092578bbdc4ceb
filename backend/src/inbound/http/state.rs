//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TaskBoard;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub tasks: Arc<dyn TaskBoard>,
}

impl HttpState {
    pub fn new(tasks: Arc<dyn TaskBoard>) -> Self {
        Self { tasks }
    }
}

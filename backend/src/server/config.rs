//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use tasks_backend::domain::ports::TaskBoard;

/// Everything the listener needs once adapters are wired.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tasks: Arc<dyn TaskBoard>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tasks: Arc<dyn TaskBoard>) -> Self {
        Self { bind_addr, tasks }
    }
}

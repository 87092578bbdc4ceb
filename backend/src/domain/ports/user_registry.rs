//! Port for looking up registered users.
use async_trait::async_trait;

use crate::domain::{Principal, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user registry adapters.
    pub enum UserRegistryError {
        /// Registry connection could not be established.
        Connection { message: String } => "user registry connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "user registry query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Principal>, UserRegistryError>;
}

//! Port for crediting a user's balance in the account service.
use async_trait::async_trait;

use crate::domain::{BalanceUpdate, BearerCredential};

use super::define_port_error;

define_port_error! {
    /// Errors raised while forwarding a balance update.
    pub enum BalanceForwarderError {
        /// The request never produced a response.
        Transport { message: String } => "balance service transport failed: {message}",
        /// The balance service answered with a non-success status.
        Rejected { status: u16, body: String } =>
            "balance service rejected the update with status {status}: {body}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceForwarder: Send + Sync {
    /// Send `update` on behalf of the caller identified by `credential`.
    async fn forward(
        &self,
        update: &BalanceUpdate,
        credential: &BearerCredential,
    ) -> Result<(), BalanceForwarderError>;
}

//! Port for the per-user record of tasks already sent to moderation.
use async_trait::async_trait;

use crate::domain::Username;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by progress ledger adapters.
    pub enum ProgressLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } => "progress ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "progress ledger query failed: {message}",
    }
}

/// Append-only set of task ids per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressLedger: Send + Sync {
    /// Whether `task_id` is already recorded for `username`.
    async fn contains(
        &self,
        username: &Username,
        task_id: i64,
    ) -> Result<bool, ProgressLedgerError>;

    /// Record `task_id` for `username`. Recording an existing id is a no-op.
    async fn append(&self, username: &Username, task_id: i64) -> Result<(), ProgressLedgerError>;
}

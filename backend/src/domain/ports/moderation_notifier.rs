//! Port for delivering submissions to the moderator chat.
use async_trait::async_trait;

use crate::domain::ModerationMessage;

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering a moderation message.
    pub enum ModerationNotifierError {
        /// The request never produced a response.
        Transport { message: String } => "moderation transport failed: {message}",
        /// The moderation surface answered with a non-success status.
        Rejected { status: u16, body: String } =>
            "moderation surface rejected the message with status {status}: {body}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationNotifier: Send + Sync {
    /// Deliver the message, uploading its attachment when present.
    async fn deliver(&self, message: &ModerationMessage) -> Result<(), ModerationNotifierError>;
}

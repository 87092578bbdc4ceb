//! Driving port for the task board use-cases.
//!
//! Inbound adapters call this port with the caller's bearer credential;
//! authentication happens inside each operation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    AnswerSubmission, AnswerVerdict, BearerCredential, Error, ModerationSubmission, TaskDay,
    TaskListing,
};

/// Acknowledgement returned once a submission is with the moderators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationAck {
    pub status: u16,
}

impl ModerationAck {
    pub fn accepted() -> Self {
        Self { status: 200 }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskBoard: Send + Sync {
    /// List tasks for days `1..=day`, or every task when `day` is absent.
    async fn list_tasks(
        &self,
        credential: &BearerCredential,
        day: Option<TaskDay>,
    ) -> Result<TaskListing, Error>;

    /// Forward completed work to the moderators, once per user and task.
    async fn submit_for_moderation(
        &self,
        credential: &BearerCredential,
        submission: ModerationSubmission,
    ) -> Result<ModerationAck, Error>;

    /// Check an answer against the answer key, crediting the user on a match.
    async fn check_answer(
        &self,
        credential: &BearerCredential,
        submission: AnswerSubmission,
    ) -> Result<AnswerVerdict, Error>;
}

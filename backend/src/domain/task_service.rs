//! Task board orchestration.
//!
//! [`TaskService`] implements the [`TaskBoard`] driving port by composing the
//! identity verifier, the day cache, the task sheet and the outbound
//! notification and balance ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    BalanceForwarder, BalanceForwarderError, ModerationAck, ModerationNotifier,
    ModerationNotifierError, ProgressLedger, ProgressLedgerError, TaskBoard, TaskSheetError,
};
use crate::domain::{
    AnswerLinks, AnswerOracle, AnswerSubmission, AnswerVerdict, BalanceUpdate, BearerCredential,
    DayAggregator, Error, IdentityVerifier, ModerationMessage, ModerationSubmission, TaskDay,
    TaskListing, normalise_answer,
};

fn map_sheet_error(error: TaskSheetError) -> Error {
    match error {
        TaskSheetError::SourceUnavailable { .. }
        | TaskSheetError::DataNotFound { .. }
        | TaskSheetError::TaskNotFound { .. } => Error::not_found(error.to_string()),
        TaskSheetError::UnsupportedFormat { .. } | TaskSheetError::SchemaMismatch { .. } => {
            Error::unprocessable(error.to_string())
        }
        TaskSheetError::Malformed { .. } => {
            Error::internal(format!("answer check failed: {error}"))
        }
    }
}

fn map_ledger_error(error: ProgressLedgerError) -> Error {
    match error {
        ProgressLedgerError::Connection { message } => {
            Error::service_unavailable(format!("progress ledger unavailable: {message}"))
        }
        ProgressLedgerError::Query { message } => {
            Error::internal(format!("progress ledger error: {message}"))
        }
    }
}

fn map_notifier_error(error: ModerationNotifierError) -> Error {
    match error {
        ModerationNotifierError::Transport { message } => Error::upstream(
            format!("failed to send task to moderator: {message}"),
            None,
            "",
        ),
        ModerationNotifierError::Rejected { status, body } => Error::upstream(
            format!("failed to send task to moderator: {body}"),
            Some(status),
            &body,
        ),
    }
}

fn map_balance_error(error: BalanceForwarderError) -> Error {
    match error {
        BalanceForwarderError::Transport { message } => Error::upstream(
            format!("balance update failed: {message}"),
            None,
            "",
        ),
        BalanceForwarderError::Rejected { status, body } => Error::upstream(
            format!("balance update rejected with status {status}"),
            Some(status),
            &body,
        ),
    }
}

/// Outbound collaborators used by [`TaskService`].
#[derive(Clone)]
pub struct TaskServicePorts {
    pub identity: IdentityVerifier,
    pub days: DayAggregator,
    pub oracle: AnswerOracle,
    pub ledger: Arc<dyn ProgressLedger>,
    pub notifier: Arc<dyn ModerationNotifier>,
    pub balance: Arc<dyn BalanceForwarder>,
    pub answer_links: Arc<AnswerLinks>,
}

/// Task board service implementing the [`TaskBoard`] driving port.
#[derive(Clone)]
pub struct TaskService {
    ports: TaskServicePorts,
}

impl TaskService {
    pub fn new(ports: TaskServicePorts) -> Self {
        Self { ports }
    }

    /// Split the listing projection into day buckets and cache each one.
    ///
    /// Buckets for every listable day are written whatever day was requested.
    async fn populate_cache(&self, full: &crate::domain::TaskTable) {
        let layout = self.ports.oracle.layout();
        for day in TaskDay::all() {
            let bucket = full.rows_for_day(layout, day.get());
            self.ports.days.put(day.get(), &bucket).await;
        }
    }
}

#[async_trait]
impl TaskBoard for TaskService {
    async fn list_tasks(
        &self,
        credential: &BearerCredential,
        day: Option<TaskDay>,
    ) -> Result<TaskListing, Error> {
        let principal = self.ports.identity.verify(credential).await?;
        info!(username = %principal.username(), day = ?day.map(TaskDay::get), "listing tasks");

        if let Some(rows) = self.ports.days.accumulate(day).await {
            info!(rows = rows.len(), "tasks served from cache");
            return Ok(TaskListing::from_cache(day, rows));
        }

        let oracle = &self.ports.oracle;
        let layout = oracle.layout();
        let hidden = [layout.answer_column.as_str(), layout.avatar_column.as_str()];
        let table = oracle.read_table().await.map_err(map_sheet_error)?;
        let full = oracle.project(table, &hidden, None).map_err(map_sheet_error)?;
        let listing = oracle
            .project(full.clone(), &[], day)
            .map_err(map_sheet_error)?;

        if listing.is_empty() {
            return Err(Error::invalid_request("task sheet produced no rows"));
        }

        if full.has_column(&layout.day_column) {
            self.populate_cache(&full).await;
        } else {
            warn!(column = %layout.day_column, "task sheet has no day column; cache not populated");
        }

        info!(rows = listing.records().len(), "tasks served from task sheet");
        Ok(TaskListing::from_sheet(listing.into_records()))
    }

    async fn submit_for_moderation(
        &self,
        credential: &BearerCredential,
        submission: ModerationSubmission,
    ) -> Result<ModerationAck, Error> {
        let principal = self.ports.identity.verify(credential).await?;
        let username = principal.username();
        let task_id = submission.task_id;

        if self
            .ports
            .ledger
            .contains(username, task_id)
            .await
            .map_err(map_ledger_error)?
        {
            info!(%username, task_id, "task already with moderators; skipping notification");
            return Ok(ModerationAck::accepted());
        }

        let message = ModerationMessage::compose(submission, username, &self.ports.answer_links)?;
        let with_media = message.attachment.is_some();
        self.ports
            .notifier
            .deliver(&message)
            .await
            .map_err(map_notifier_error)?;
        info!(%username, task_id, with_media, "task sent to moderators");

        self.ports
            .ledger
            .append(username, task_id)
            .await
            .map_err(map_ledger_error)?;
        Ok(ModerationAck::accepted())
    }

    async fn check_answer(
        &self,
        credential: &BearerCredential,
        submission: AnswerSubmission,
    ) -> Result<AnswerVerdict, Error> {
        let principal = self.ports.identity.verify(credential).await?;
        let task_id = submission.task_id;

        let expected = self
            .ports
            .oracle
            .lookup_answer(task_id)
            .await
            .map_err(map_sheet_error)?;
        let is_correct = expected == normalise_answer(&submission.user_answer);
        info!(username = %principal.username(), task_id, is_correct, "answer checked");

        if is_correct {
            let update = BalanceUpdate::approved(task_id, submission.user_id, submission.value);
            self.ports
                .balance
                .forward(&update, credential)
                .await
                .map_err(map_balance_error)?;
        }

        Ok(AnswerVerdict {
            task_id,
            is_correct,
        })
    }
}

#[cfg(test)]
#[path = "task_service_tests.rs"]
mod tests;

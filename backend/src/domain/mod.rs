//! Domain primitives, services and ports.
//!
//! Purpose: model the task board independently of transport and storage.
//! Outbound collaborators are reached through the traits in [`ports`];
//! inbound adapters drive the [`ports::TaskBoard`] use-cases.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TaskRecord / TaskTable / TaskDay: task catalogue model.
//! - BearerCredential / Principal / IdentityVerifier: caller identity.
//! - ModerationMessage and friends: moderator notifications.
//! - AnswerOracle / DayAggregator / TaskService: domain services.

pub mod answer_oracle;
pub mod day_aggregator;
pub mod error;
pub mod identity;
pub mod moderation;
pub mod ports;
pub mod task;
pub mod task_service;
pub mod trace_id;

pub use self::answer_oracle::{AnswerOracle, normalise_answer};
pub use self::day_aggregator::DayAggregator;
pub use self::error::{Error, ErrorCode};
pub use self::identity::{
    BearerCredential, IdentityValidationError, IdentityVerifier, Principal, Username,
};
pub use self::moderation::{
    AnswerLinks, MediaAttachment, MediaKind, MediaUpload, ModerationActions, ModerationMessage,
    ModerationSubmission,
};
pub use self::task::{
    AnswerSubmission, AnswerVerdict, BalanceUpdate, ListingSource, SheetLayout, TaskDay,
    TaskDayError, TaskListing, TaskRecord, TaskStatus, TaskTable, whole_float,
};
pub use self::task_service::{TaskService, TaskServicePorts};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use tasks_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("task 4 not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

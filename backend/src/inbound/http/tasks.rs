//! Task board HTTP handlers.
//!
//! ```text
//! GET  /playit/tasks/get-all?day=2
//! POST /playit/tasks/create/moderation   (multipart/form-data)
//! POST /playit/tasks/create/autocheck    {"task_id":1,"user_id":2,"value":10,"user_answer":"cat"}
//! ```

use actix_multipart::form::{MultipartForm, MultipartFormConfig, bytes::Bytes, text::Text};
use actix_web::{HttpRequest, Scope, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ModerationAck;
use crate::domain::{
    AnswerSubmission, AnswerVerdict, Error, MediaUpload, ModerationSubmission, TaskDay,
    TaskListing, TaskRecord,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::credential::CallerCredential;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Upper bound for a moderation upload, text fields included.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Query string for `GET /playit/tasks/get-all`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// Last day to include, 1 to 3. All tasks when omitted.
    #[param(minimum = 1, maximum = 3)]
    pub day: Option<i64>,
}

/// Task catalogue response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListingResponse {
    #[schema(example = 200)]
    pub status: u16,
    #[schema(example = "Tasks for days 1-2 served from cache.")]
    pub details: String,
    /// Task rows keyed by sheet column header.
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<TaskRecord>,
}

impl From<TaskListing> for TaskListingResponse {
    fn from(value: TaskListing) -> Self {
        Self {
            status: value.status,
            details: value.details,
            data: value.data,
        }
    }
}

/// Multipart form for `POST /playit/tasks/create/moderation`.
#[derive(Debug, MultipartForm)]
pub struct ModerationForm {
    pub task_id: Text<i64>,
    pub user_id: Text<i64>,
    pub value: Text<i64>,
    pub text: Option<Text<String>>,
    pub file: Option<Bytes>,
}

impl ModerationForm {
    fn into_submission(self) -> ModerationSubmission {
        let file = self.file.map(|upload| MediaUpload {
            file_name: upload.file_name.unwrap_or_else(|| "upload".to_owned()),
            content_type: upload.content_type.map(|mime| mime.to_string()),
            bytes: upload.data.to_vec(),
        });
        ModerationSubmission {
            task_id: self.task_id.into_inner(),
            user_id: self.user_id.into_inner(),
            value: self.value.into_inner(),
            text: self.text.map(Text::into_inner),
            file,
        }
    }
}

/// Documentation shape of [`ModerationForm`].
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ModerationFormSchema {
    task_id: i64,
    user_id: i64,
    /// Points awarded when the submission is approved.
    value: i64,
    /// Free-form description of the completed work.
    text: Option<String>,
    /// Photo (`image/*`) or video (`video/*`) evidence.
    #[schema(value_type = Option<String>, format = Binary)]
    file: Option<Vec<u8>>,
}

/// Acknowledgement body for moderation submissions.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModerationAckResponse {
    #[schema(example = 200)]
    pub status: u16,
}

impl From<ModerationAck> for ModerationAckResponse {
    fn from(value: ModerationAck) -> Self {
        Self {
            status: value.status,
        }
    }
}

/// Answer submitted to `POST /playit/tasks/create/autocheck`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AutocheckRequest {
    pub task_id: i64,
    pub user_id: i64,
    /// Points credited when the answer is correct.
    pub value: i64,
    pub user_answer: String,
}

impl From<AutocheckRequest> for AnswerSubmission {
    fn from(value: AutocheckRequest) -> Self {
        Self {
            task_id: value.task_id,
            user_id: value.user_id,
            value: value.value,
            user_answer: value.user_answer,
        }
    }
}

/// Verdict body for answer checks.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AutocheckResponse {
    pub task_id: i64,
    pub is_correct: bool,
}

impl From<AnswerVerdict> for AutocheckResponse {
    fn from(value: AnswerVerdict) -> Self {
        Self {
            task_id: value.task_id,
            is_correct: value.is_correct,
        }
    }
}

fn parse_day(raw: Option<i64>) -> Result<Option<TaskDay>, Error> {
    raw.map(TaskDay::new).transpose().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "day",
            "min": TaskDay::MIN,
            "max": TaskDay::MAX,
        }))
    })
}

/// List tasks, from the day cache when it holds every requested day.
#[utoipa::path(
    get,
    path = "/playit/tasks/get-all",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Task catalogue", body = TaskListingResponse),
        (status = 400, description = "Invalid day or empty catalogue", body = ErrorSchema),
        (status = 401, description = "Missing or invalid credential", body = ErrorSchema),
        (status = 404, description = "Task sheet not found", body = ErrorSchema),
        (status = 422, description = "Task sheet has an unexpected shape", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/get-all")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    credential: CallerCredential,
    query: web::Query<ListTasksQuery>,
) -> ApiResult<web::Json<TaskListingResponse>> {
    let day = parse_day(query.into_inner().day)?;
    let listing = state
        .tasks
        .list_tasks(credential.as_credential(), day)
        .await?;
    Ok(web::Json(listing.into()))
}

/// Send completed work to the moderator chat.
#[utoipa::path(
    post,
    path = "/playit/tasks/create/moderation",
    request_body(content = ModerationFormSchema, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Submission delivered or already pending", body = ModerationAckResponse),
        (status = 400, description = "Malformed form or unsupported media type", body = ErrorSchema),
        (status = 401, description = "Missing or invalid credential", body = ErrorSchema),
        (status = 500, description = "Moderator chat rejected the submission", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "submitForModeration"
)]
#[post("/create/moderation")]
pub async fn submit_for_moderation(
    state: web::Data<HttpState>,
    credential: CallerCredential,
    MultipartForm(form): MultipartForm<ModerationForm>,
) -> ApiResult<web::Json<ModerationAckResponse>> {
    let ack = state
        .tasks
        .submit_for_moderation(credential.as_credential(), form.into_submission())
        .await?;
    Ok(web::Json(ack.into()))
}

/// Check an answer against the answer key and credit the user on a match.
#[utoipa::path(
    post,
    path = "/playit/tasks/create/autocheck",
    request_body = AutocheckRequest,
    responses(
        (status = 200, description = "Answer checked", body = AutocheckResponse),
        (status = 400, description = "Malformed request body", body = ErrorSchema),
        (status = 401, description = "Missing or invalid credential", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema),
        (status = 500, description = "Check or balance update failed", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "checkAnswer"
)]
#[post("/create/autocheck")]
pub async fn check_answer(
    state: web::Data<HttpState>,
    credential: CallerCredential,
    payload: web::Json<AutocheckRequest>,
) -> ApiResult<web::Json<AutocheckResponse>> {
    let verdict = state
        .tasks
        .check_answer(credential.as_credential(), payload.into_inner().into())
        .await?;
    Ok(web::Json(verdict.into()))
}

fn reject_payload(message: String, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(message).into()
}

/// The `/playit/tasks` scope with extractor limits and error mapping.
pub fn tasks_scope() -> Scope {
    web::scope("/playit/tasks")
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, req| reject_payload(format!("invalid query: {err}"), req)),
        )
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, req| reject_payload(format!("invalid JSON body: {err}"), req)),
        )
        .app_data(
            MultipartFormConfig::default()
                .total_limit(MAX_UPLOAD_BYTES)
                .memory_limit(MAX_UPLOAD_BYTES)
                .error_handler(|err, req| reject_payload(format!("invalid form: {err}"), req)),
        )
        .service(list_tasks)
        .service(submit_for_moderation)
        .service(check_answer)
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;

//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The credential is missing, invalid, or names an unknown user.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested task or task sheet does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The task sheet does not have the expected shape.
    #[schema(rename = "unprocessable_entity")]
    UnprocessableEntity,
    /// A backing store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The moderator chat or balance service rejected a call.
    #[schema(rename = "upstream_failure")]
    UpstreamFailure,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "day must be between 1 and 3, got 4")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` response header.
    #[schema(example = "6f1c7d4e-8a0b-4c3e-9d2f-1a2b3c4d5e6f")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

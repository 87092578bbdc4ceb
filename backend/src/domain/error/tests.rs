//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no auth"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::unprocessable("shape"), ErrorCode::UnprocessableEntity)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::upstream("rejected", Some(400), "oops"), ErrorCode::UpstreamFailure)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async { Error::not_found("task 3 not found") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn internal_keeps_cause_in_details() {
    let error = Error::internal("pool exhausted");
    assert_eq!(error.details(), Some(&json!({"cause": "pool exhausted"})));
}

#[rstest]
fn upstream_carries_status_and_body() {
    let error = Error::upstream("moderation delivery failed", Some(403), "forbidden");
    assert_eq!(
        error.details(),
        Some(&json!({"upstreamStatus": 403, "upstreamBody": "forbidden"}))
    );
}

#[rstest]
fn serialises_with_camel_case_and_snake_case_code(expected_trace_id: String) {
    let error = Error::invalid_request("day must be between 1 and 3")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "day"}));

    let value = serde_json::to_value(&error).expect("error serialises");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "day must be between 1 and 3",
            "traceId": expected_trace_id,
            "details": {"field": "day"},
        })
    );
}

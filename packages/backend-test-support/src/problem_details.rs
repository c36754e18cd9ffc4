//! Problem Details test helpers for backend testing
//!
//! This module asserts the error contract without depending on backend
//! types, so it can be shared by any test binary.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Local mirror of the backend's ProblemDetails body.
#[derive(Debug, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Assert that a service response conforms to the stable error contract
///
/// Validates:
/// - HTTP status matches expected
/// - content type is `application/problem+json`
/// - `x-trace-id` header exists and matches body `trace_id`
/// - `code` matches, and `detail` contains the given fragment
///
/// Returns the parsed body for further checks.
pub async fn assert_problem_details<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike
where
    B: MessageBody,
{
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_status,
        expected_code,
        expected_detail_contains,
    )
}

/// Same checks on raw response parts.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &actix_web::http::header::HeaderMap,
    body_bytes: &[u8],
    expected_status: StatusCode,
    expected_code: &str,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    let raw = String::from_utf8_lossy(body_bytes);
    assert_eq!(status, expected_status, "unexpected status, body: {raw}");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let header_trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present")
        .to_string();

    let problem: ProblemDetailsLike = serde_json::from_slice(body_bytes)
        .unwrap_or_else(|_| panic!("Failed to parse ProblemDetails. Raw body: {raw}"));

    assert_eq!(problem.status, expected_status.as_u16());
    assert_eq!(problem.code, expected_code, "unexpected code, body: {raw}");
    assert_eq!(problem.trace_id, header_trace_id);
    assert!(problem.type_.ends_with(expected_code));
    if let Some(fragment) = expected_detail_contains {
        assert!(
            problem.detail.contains(fragment),
            "detail {:?} should contain {fragment:?}",
            problem.detail
        );
    }

    match expected_status.as_u16() {
        401 => assert_eq!(
            headers
                .get("www-authenticate")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer"),
            "401 responses must carry WWW-Authenticate: Bearer"
        ),
        503 => assert!(
            headers.get("retry-after").is_some(),
            "503 responses must carry Retry-After"
        ),
        _ => {
            assert!(headers.get("www-authenticate").is_none());
            assert!(headers.get("retry-after").is_none());
        }
    }

    problem
}

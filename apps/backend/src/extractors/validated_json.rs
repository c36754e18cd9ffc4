use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::web::Bytes;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;

/// JSON request body whose parse failures become 400 `BAD_REQUEST` Problem
/// Details instead of actix's plain-text errors. An empty body is an error;
/// see `OptionalJson` for endpoints where the body may be omitted.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = Bytes::from_request(req, payload);
        let path = req.path().to_owned();

        Box::pin(async move {
            let body = read_body(body, &path).await?;
            if is_blank(&body) {
                return Err(AppError::bad_request(
                    ErrorCode::BadRequest,
                    "Invalid JSON: request body is empty",
                ));
            }
            parse(&body, &path).map(ValidatedJson)
        })
    }
}

/// Like `ValidatedJson`, but an empty body yields `T::default()`.
///
/// Not `Option<ValidatedJson<T>>`: actix maps every extraction error to
/// `None` there, which would accept malformed bodies as "absent".
#[derive(Debug)]
pub struct OptionalJson<T>(pub T);

impl<T> OptionalJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for OptionalJson<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = Bytes::from_request(req, payload);
        let path = req.path().to_owned();

        Box::pin(async move {
            let body = read_body(body, &path).await?;
            if is_blank(&body) {
                return Ok(OptionalJson(T::default()));
            }
            parse(&body, &path).map(OptionalJson)
        })
    }
}

async fn read_body(
    body: <Bytes as FromRequest>::Future,
    path: &str,
) -> Result<Bytes, AppError> {
    body.await.map_err(|e| {
        debug!(path = %path, error = %e, "request body unreadable");
        AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
    })
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn parse<T: DeserializeOwned>(body: &[u8], path: &str) -> Result<T, AppError> {
    serde_json::from_slice::<T>(body).map_err(|e| {
        debug!(
            path = %path,
            error = %Redacted(&e.to_string()),
            body_size = body.len(),
            "JSON body rejected"
        );
        AppError::bad_request(ErrorCode::BadRequest, describe(&e))
    })
}

/// Field names are safe to echo back; values are not.
fn describe(error: &serde_json::Error) -> String {
    match error.classify() {
        Category::Syntax => format!("Invalid JSON at line {}", error.line()),
        Category::Eof => "Invalid JSON: unexpected end of input".to_owned(),
        Category::Data => {
            let message = error.to_string();
            match message.split(" at line ").next() {
                Some(head) if head.starts_with("missing field") || head.starts_with("unknown field") => {
                    let field = head.split('`').nth(1).unwrap_or_default();
                    let kind = if head.starts_with("missing") { "missing" } else { "unknown" };
                    format!("Invalid JSON: {kind} field `{field}`")
                }
                _ => "Invalid JSON: wrong types for one or more fields".to_owned(),
            }
        }
        Category::Io => "Invalid JSON: could not read body".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct NewCategory {
        name: String,
        #[serde(default)]
        description: String,
    }

    fn parse_err(json: &str) -> String {
        describe(&serde_json::from_str::<NewCategory>(json).unwrap_err())
    }

    #[test]
    fn describes_syntax_and_eof() {
        assert_eq!(parse_err("{\n\"name\": }"), "Invalid JSON at line 2");
        assert_eq!(parse_err(r#"{"name": "Music""#), "Invalid JSON: unexpected end of input");
    }

    #[test]
    fn names_missing_and_unknown_fields() {
        assert_eq!(parse_err(r#"{"description": "x"}"#), "Invalid JSON: missing field `name`");
        assert_eq!(
            parse_err(r#"{"name": "Music", "colour": "red"}"#),
            "Invalid JSON: unknown field `colour`"
        );
    }

    #[test]
    fn hides_offending_values() {
        let detail = parse_err(r#"{"name": 42}"#);
        assert_eq!(detail, "Invalid JSON: wrong types for one or more fields");
        assert!(!detail.contains("42"));
    }

    #[actix_web::test]
    async fn extracts_valid_bodies() {
        let (req, mut payload) = TestRequest::post()
            .set_payload(r#"{"name": "Music"}"#)
            .to_http_parts();
        let body = ValidatedJson::<NewCategory>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(body.name, "Music");
        assert!(body.into_inner().description.is_empty());
    }

    #[actix_web::test]
    async fn optional_body_defaults_only_when_empty() {
        #[derive(Debug, Default, Deserialize)]
        struct Notes {
            notes: Option<String>,
        }

        let (req, mut payload) = TestRequest::post().to_http_parts();
        let body = OptionalJson::<Notes>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert!(body.into_inner().notes.is_none());

        let (req, mut payload) = TestRequest::post()
            .set_payload(r#"{"notes": 42}"#)
            .to_http_parts();
        let err = OptionalJson::<Notes>::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn rejects_empty_bodies() {
        let (req, mut payload) = TestRequest::post().set_payload("  ").to_http_parts();
        let err = ValidatedJson::<NewCategory>::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }
}

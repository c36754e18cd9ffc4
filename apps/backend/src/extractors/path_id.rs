use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Positive integer id taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

impl PathId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(PathId(id)),
            _ => Err(AppError::bad_request(
                ErrorCode::InvalidId,
                format!("Invalid id: {raw}"),
            )),
        }
    }
}

impl FromRequest for PathId {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .match_info()
            .get("id")
            .ok_or_else(|| AppError::bad_request(ErrorCode::InvalidId, "Missing id parameter"))
            .and_then(PathId::parse);
        std::future::ready(result)
    }
}

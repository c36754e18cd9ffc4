use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};

use crate::AppError;

/// Raw bearer token from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

impl AuthToken {
    pub fn from_req(req: &HttpRequest) -> Result<Self, AppError> {
        let auth_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(AppError::unauthorized_missing_bearer)?
            .to_str()
            .map_err(|_| AppError::unauthorized_missing_bearer())?;

        // "Bearer <token>", scheme case-insensitive
        let mut parts = auth_value.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
                Ok(AuthToken {
                    token: token.to_string(),
                })
            }
            _ => Err(AppError::unauthorized_missing_bearer()),
        }
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        std::future::ready(Self::from_req(req))
    }
}

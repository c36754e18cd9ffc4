use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};

use super::auth_token::AuthToken;
use crate::auth::jwt::verify_access_token;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::domain::{primary_role_label, Role};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::users::User;
use crate::repos::{roles, users};
use crate::state::app_state::AppState;

/// The authenticated caller: a verified bearer token resolved to a live
/// user row and its group memberships.
///
/// Use `OptionalUser` for endpoints where authentication is optional.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Memberships, highest precedence first
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    /// Group membership only; `is_superuser` grants nothing here until the
    /// account is put in a group (`ems-manage assign-admin`).
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }

    pub fn primary_role(&self) -> &'static str {
        primary_role_label(&self.roles)
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = AuthToken::from_req(&req)?;
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;
            let claims = verify_access_token(&token.token, &state.security)?;
            let user_id = claims.user_id()?;

            let shared_txn = req.extensions().get::<SharedTxn>().cloned();
            let (user, roles) = match shared_txn {
                Some(shared) => load(shared.transaction(), user_id).await?,
                None => load(require_db(state)?, user_id).await?,
            };

            let user = user.ok_or_else(AppError::forbidden_user_not_found)?;
            if !user.is_active {
                return Err(AppError::forbidden(
                    ErrorCode::AccountDisabled,
                    "This account has been disabled",
                ));
            }
            Ok(CurrentUser { user, roles })
        })
    }
}

/// Authentication for public endpoints that personalise their answer.
///
/// No `Authorization` header means anonymous. A header that is present must
/// resolve to a `CurrentUser`; its errors (expired or invalid token, disabled
/// account) are returned as-is instead of falling back to anonymous.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl OptionalUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(CurrentUser::id)
    }
}

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if !req.headers().contains_key(header::AUTHORIZATION) {
            return Box::pin(std::future::ready(Ok::<_, AppError>(OptionalUser(None))));
        }
        let current = CurrentUser::from_request(req, payload);
        Box::pin(async move { Ok::<_, AppError>(OptionalUser(Some(current.await?))) })
    }
}

async fn load<C: sea_orm::ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(Option<User>, Vec<Role>), AppError> {
    let Some(user) = users::find_user_by_id(conn, user_id).await? else {
        return Ok((None, Vec::new()));
    };
    let roles = roles::roles_for_user(conn, user_id).await?;
    Ok((Some(user), roles))
}

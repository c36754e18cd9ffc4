//! User administration under `/api/admin`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::dashboard::admin_dashboard;
use crate::db::txn::with_txn;
use crate::domain::{Role, NO_ROLE};
use crate::error::AppError;
use crate::extractors::{AdminOnly, Authorized, PathId, ValidatedJson};
use crate::services::admin_users::AdminUserService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
struct RoleResponse {
    user_id: i64,
    username: String,
    current_role: &'static str,
    available_roles: Vec<&'static str>,
}

fn available_roles() -> Vec<&'static str> {
    Role::ALL.iter().map(|r| r.as_str()).collect()
}

async fn delete_user(
    req: HttpRequest,
    id: PathId,
    _caller: Authorized<AdminOnly>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { AdminUserService::new().delete(txn, id.0).await })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn get_role(
    req: HttpRequest,
    id: PathId,
    _caller: Authorized<AdminOnly>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (user, role) = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { AdminUserService::new().current_role(txn, id.0).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(RoleResponse {
        user_id: user.id,
        username: user.username,
        current_role: role.map_or(NO_ROLE, Role::as_str),
        available_roles: available_roles(),
    }))
}

async fn update_role(
    req: HttpRequest,
    id: PathId,
    _caller: Authorized<AdminOnly>,
    app_state: web::Data<AppState>,
    body: ValidatedJson<RoleUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let role = body.into_inner().role;

    let (user, role) = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { AdminUserService::new().update_role(txn, id.0, &role).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(RoleResponse {
        user_id: user.id,
        username: user.username,
        current_role: role.as_str(),
        available_roles: available_roles(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::get().to(admin_dashboard))
        .route("/users/{id}", web::delete().to(delete_user))
        .service(
            web::resource("/users/{id}/role")
                .route(web::get().to(get_role))
                .route(web::put().to(update_role)),
        );
}

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::views::CategoryView;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{AdminOrOrganizer, Authorized, PathId, ValidatedJson};
use crate::services::categories::CategoryService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

async fn list_categories(
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let rows = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { CategoryService::new().list(txn).await })
    })
    .await?;

    let body: Vec<CategoryView> = rows
        .into_iter()
        .map(|(category, count)| CategoryView::with_count(category, count))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_category(
    req: HttpRequest,
    id: PathId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let category = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { CategoryService::new().get(txn, id.0).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(CategoryView::from(category)))
}

async fn create_category(
    req: HttpRequest,
    _caller: Authorized<AdminOrOrganizer>,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let CategoryRequest { name, description } = body.into_inner();

    let category = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            CategoryService::new()
                .create(txn, &name, &description)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/categories/{}", category.id)))
        .json(CategoryView::from(category)))
}

async fn update_category(
    req: HttpRequest,
    id: PathId,
    _caller: Authorized<AdminOrOrganizer>,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let CategoryRequest { name, description } = body.into_inner();

    let category = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            CategoryService::new()
                .update(txn, id.0, &name, &description)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(CategoryView::from(category)))
}

async fn delete_category(
    req: HttpRequest,
    id: PathId,
    _caller: Authorized<AdminOrOrganizer>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { CategoryService::new().delete(txn, id.0).await })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_categories))
            .route(web::post().to(create_category)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_category))
            .route(web::put().to(update_category))
            .route(web::delete().to(delete_category)),
    );
}

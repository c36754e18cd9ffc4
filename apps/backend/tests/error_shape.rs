mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use common::{bearer, seed_user, test_state};
use ems_backend::domain::Role;
use ems_backend::infra::state::build_state;
use ems_backend::repos::users;
use ems_backend::test_support::create_test_app;
use ems_backend::entities::users as users_entity;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

#[actix_web::test]
async fn malformed_json_is_a_problem_document() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/accounts/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"username\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem_details(
        resp,
        StatusCode::BAD_REQUEST,
        "BAD_REQUEST",
        Some("Invalid JSON"),
    )
    .await;
    assert!(!problem.trace_id.is_empty());
    Ok(())
}

#[actix_web::test]
async fn expired_and_foreign_tokens_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let user = seed_user(&state, "clock", Some(Role::Participant)).await;

    let issued_at = time::OffsetDateTime::now_utc() - time::Duration::hours(2);
    let expired =
        ems_backend::mint_access_token(user.id, &user.username, issued_at, &state.security)?;
    let req = test::TestRequest::get()
        .uri("/api/accounts/profile")
        .insert_header(("Authorization", format!("Bearer {expired}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_EXPIRED_JWT", None).await;

    let foreign = ems_backend::SecurityConfig::new(b"some-other-secret".to_vec());
    let forged = ems_backend::mint_access_token(
        user.id,
        &user.username,
        time::OffsetDateTime::now_utc(),
        &foreign,
    )?;
    let req = test::TestRequest::get()
        .uri("/api/accounts/profile")
        .insert_header(("Authorization", format!("Bearer {forged}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_INVALID_JWT", None).await;

    let req = test::TestRequest::get()
        .uri("/api/accounts/profile")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_MISSING_BEARER", None)
        .await;
    Ok(())
}

#[actix_web::test]
async fn disabled_accounts_are_locked_out() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let user = seed_user(&state, "disabled", Some(Role::Participant)).await;
    let auth = bearer(&state, &user);

    let db = state.db().unwrap();
    users_entity::Entity::update_many()
        .col_expr(users_entity::Column::IsActive, Expr::value(false))
        .filter(users_entity::Column::Id.eq(user.id))
        .exec(db)
        .await?;
    assert!(!users::find_user_by_id(db, user.id).await?.unwrap().is_active);

    let req = test::TestRequest::get()
        .uri("/api/accounts/profile")
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::FORBIDDEN, "ACCOUNT_DISABLED", None).await;

    let req = test::TestRequest::post()
        .uri("/api/accounts/login")
        .set_json(serde_json::json!({ "username": user.username, "password": common::PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::FORBIDDEN, "ACCOUNT_DISABLED", None).await;
    Ok(())
}

#[actix_web::test]
async fn missing_database_is_service_unavailable() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state().build().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::SERVICE_UNAVAILABLE, "DB_UNAVAILABLE", None).await;
    Ok(())
}

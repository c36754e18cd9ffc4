mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use common::{
    bearer, future_date, registrations_for_user, seed_category, seed_event, seed_registration,
    seed_rsvp, seed_superuser, seed_user, test_state,
};
use ems_backend::domain::Role;
use ems_backend::repos::{events, roles, rsvps, users};
use ems_backend::services::admin_users::AdminUserService;
use ems_backend::test_support::create_test_app;
use serde_json::{json, Value};

#[actix_web::test]
async fn admins_read_and_replace_roles() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let admin = seed_user(&state, "admin", Some(Role::Admin)).await;
    let auth = bearer(&state, &admin);
    let target = seed_user(&state, "target", Some(Role::Participant)).await;
    let uri = format!("/api/admin/users/{}/role", target.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], target.username.as_str());
    assert_eq!(body["current_role"], "Participant");
    assert_eq!(
        body["available_roles"],
        json!(["Admin", "Organizer", "Participant"])
    );

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({ "role": "organizer" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["current_role"], "Organizer");
    assert_eq!(
        roles::roles_for_user(state.db().unwrap(), target.id).await?,
        vec![Role::Organizer]
    );

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({ "role": "Overlord" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::BAD_REQUEST, "INVALID_ROLE", None).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/users/987654/role")
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::NOT_FOUND, "USER_NOT_FOUND", None).await;
    Ok(())
}

#[actix_web::test]
async fn admins_delete_users() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let admin = seed_user(&state, "admin", Some(Role::Admin)).await;
    let auth = bearer(&state, &admin);
    let doomed = seed_user(&state, "doomed", Some(Role::Participant)).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{}", doomed.id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    assert!(users::find_user_by_id(state.db().unwrap(), doomed.id)
        .await?
        .is_none());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{}", doomed.id))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::NOT_FOUND, "USER_NOT_FOUND", None).await;

    // a deleted user's token stops working
    let req = test::TestRequest::get()
        .uri("/api/accounts/profile")
        .insert_header(("Authorization", bearer(&state, &doomed)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::FORBIDDEN, "FORBIDDEN_USER_NOT_FOUND", None).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .insert_header(("Authorization", auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_users"], 1);
    Ok(())
}

#[actix_web::test]
async fn admin_routes_need_the_admin_group() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let organizer = seed_user(&state, "org", Some(Role::Organizer)).await;

    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .insert_header(("Authorization", bearer(&state, &organizer)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        StatusCode::FORBIDDEN,
        "INSUFFICIENT_ROLE",
        Some("Admin"),
    )
    .await;

    // the superuser flag alone is not a group membership
    let root = seed_superuser(&state, "root").await;
    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .insert_header(("Authorization", bearer(&state, &root)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE", Some("Admin")).await;

    // `ems-manage assign-admin` with no name promotes the first superuser
    let promoted = AdminUserService::new()
        .assign_admin(state.db().unwrap(), None)
        .await?;
    assert_eq!(promoted.id, root.id);

    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .insert_header(("Authorization", bearer(&state, &root)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    Ok(())
}

#[actix_web::test]
async fn deleting_a_user_takes_their_rsvps_and_memberships() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let admin = seed_user(&state, "admin", Some(Role::Admin)).await;
    let doomed = seed_user(&state, "doomed", Some(Role::Organizer)).await;
    let category = seed_category(&state, "Music").await;
    let event = seed_event(&state, "Open Mic", future_date(), &category).await;
    seed_rsvp(&state, &doomed, &event, "playing guitar").await;
    seed_registration(&state, &doomed, &event).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{}", doomed.id))
        .insert_header(("Authorization", bearer(&state, &admin)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let db = state.db().unwrap();
    assert!(rsvps::find_for_user_event(db, doomed.id, event.id).await?.is_none());
    assert_eq!(rsvps::count_for_event(db, event.id).await?, 0);
    assert!(roles::roles_for_user(db, doomed.id).await?.is_empty());
    assert_eq!(registrations_for_user(&state, doomed.id).await, 0);
    // events are owned by the category, not by the attendee
    assert!(events::find(db, event.id).await?.is_some());
    Ok(())
}

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use common::{bearer, future_date, past_date, seed_category, seed_event, seed_user, test_state};
use ems_backend::domain::schedule::today_utc;
use ems_backend::domain::Role;
use ems_backend::repos::rsvps;
use ems_backend::test_support::create_test_app;
use serde_json::Value;

#[actix_web::test]
async fn organizer_dashboard_counts_and_drills_down() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let db = state.db().unwrap();
    let organizer = seed_user(&state, "org", Some(Role::Organizer)).await;
    let auth = bearer(&state, &organizer);
    let category = seed_category(&state, "Community").await;

    let upcoming = seed_event(&state, "Fair", future_date(), &category).await;
    let past = seed_event(&state, "Cleanup", past_date(), &category).await;
    seed_event(&state, "Standup", today_utc(), &category).await;

    let alice = seed_user(&state, "alice", Some(Role::Participant)).await;
    let bob = seed_user(&state, "bob", Some(Role::Participant)).await;
    rsvps::create(db, alice.id, upcoming.id, None).await?;
    rsvps::create(db, alice.id, past.id, None).await?;
    rsvps::create(db, bob.id, upcoming.id, None).await?;

    let req = test::TestRequest::get()
        .uri("/api/dashboard/organizer")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_events"], 3);
    assert_eq!(body["upcoming_events"], 1);
    assert_eq!(body["past_events"], 1);
    assert_eq!(body["total_participants"], 2);
    assert_eq!(body["todays_events"][0]["name"], "Standup");
    assert!(body.get("stats_type").is_none());

    let req = test::TestRequest::get()
        .uri("/api/dashboard/organizer?stats=upcoming")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["stats_type"], "upcoming");
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["rsvp_count"], 2);

    let req = test::TestRequest::get()
        .uri("/api/dashboard/organizer?stats=participants")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let mut names: Vec<&str> = body["participants"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["username"].as_str())
        .collect();
    names.sort_unstable();
    let mut expected = vec![alice.username.as_str(), bob.username.as_str()];
    expected.sort_unstable();
    assert_eq!(names, expected);

    // unknown drill-downs fall back to the summary
    let req = test::TestRequest::get()
        .uri("/api/dashboard/organizer?stats=everything")
        .insert_header(("Authorization", auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.get("stats_type").is_none());
    assert!(body.get("events").is_none());
    Ok(())
}

#[actix_web::test]
async fn organizer_dashboard_rejects_participants() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let participant = seed_user(&state, "part", Some(Role::Participant)).await;

    let req = test::TestRequest::get()
        .uri("/api/dashboard/organizer")
        .insert_header(("Authorization", bearer(&state, &participant)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE", None).await;
    Ok(())
}

#[actix_web::test]
async fn participant_dashboard_splits_upcoming_and_past() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let db = state.db().unwrap();
    let category = seed_category(&state, "Sport").await;
    let next = seed_event(&state, "Final", future_date(), &category).await;
    let today = seed_event(&state, "Warmup", today_utc(), &category).await;
    let last = seed_event(&state, "Semi", past_date(), &category).await;
    let fan = seed_user(&state, "fan", Some(Role::Participant)).await;
    let other = seed_user(&state, "other", Some(Role::Participant)).await;
    for event in [&next, &today, &last] {
        rsvps::create(db, fan.id, event.id, None).await?;
    }
    rsvps::create(db, other.id, next.id, None).await?;

    let req = test::TestRequest::get()
        .uri("/api/dashboard/participant")
        .insert_header(("Authorization", bearer(&state, &fan)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_rsvps"], 3);
    let upcoming: Vec<&str> = body["upcoming_rsvps"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["event"]["name"].as_str())
        .collect();
    assert_eq!(upcoming.len(), 2);
    assert!(upcoming.contains(&"Final") && upcoming.contains(&"Warmup"));
    assert_eq!(body["past_rsvps"][0]["event"]["name"], "Semi");
    assert_eq!(body["past_rsvps"][0]["user_id"], fan.id);
    Ok(())
}

#[actix_web::test]
async fn admin_dashboard_summarises_users() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let db = state.db().unwrap();
    let admin = seed_user(&state, "admin", Some(Role::Admin)).await;
    seed_user(&state, "org", Some(Role::Organizer)).await;
    let fan = seed_user(&state, "fan", Some(Role::Participant)).await;
    seed_user(&state, "nobody", None).await;
    let category = seed_category(&state, "Misc").await;
    let event = seed_event(&state, "Party", future_date(), &category).await;
    rsvps::create(db, fan.id, event.id, None).await?;

    let req = test::TestRequest::get()
        .uri("/api/dashboard/admin")
        .insert_header(("Authorization", bearer(&state, &admin)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_users"], 4);
    assert_eq!(body["admin_count"], 1);
    assert_eq!(body["organizer_count"], 1);
    assert_eq!(body["participant_count"], 1);

    let users = body["users"].as_array().unwrap();
    let fan_row = users
        .iter()
        .find(|u| u["id"] == fan.id)
        .expect("fan listed");
    assert_eq!(fan_row["rsvp_count"], 1);
    assert_eq!(fan_row["primary_role"], "Participant");
    let nobody = users
        .iter()
        .find(|u| u["roles"].as_array().is_some_and(|r| r.is_empty()))
        .expect("role-less user listed");
    assert_eq!(nobody["primary_role"], "No Role");
    Ok(())
}

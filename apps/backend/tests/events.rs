mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use common::{
    bearer, future_date, past_date, registrations_for_event, seed_category, seed_event,
    seed_registration, seed_rsvp, seed_user, test_state,
};
use ems_backend::domain::Role;
use ems_backend::repos::rsvps;
use ems_backend::test_support::create_test_app;
use serde_json::{json, Value};

fn event_body(category_id: i64) -> Value {
    json!({
        "name": "Rust Meetup",
        "description": "Talks and pizza",
        "date": "2099-09-01",
        "time": "19:00",
        "location": "Community Centre",
        "category_id": category_id
    })
}

#[actix_web::test]
async fn organizers_manage_events() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let organizer = seed_user(&state, "org", Some(Role::Organizer)).await;
    let auth = bearer(&state, &organizer);
    let tech = seed_category(&state, "Tech").await;

    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(("Authorization", auth.clone()))
        .set_json(event_body(tech.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(location.as_deref(), Some(format!("/api/events/{id}").as_str()));
    assert_eq!(created["date"], "2099-09-01");
    assert_eq!(created["time"], "19:00");
    assert_eq!(created["created_by"], organizer.id);

    let mut changed = event_body(tech.id);
    changed["name"] = json!("Rust Meetup (moved)");
    changed["time"] = json!("20:15:00");
    let req = test::TestRequest::put()
        .uri(&format!("/api/events/{id}"))
        .insert_header(("Authorization", auth.clone()))
        .set_json(changed)
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["name"], "Rust Meetup (moved)");
    assert_eq!(updated["time"], "20:15");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/events/{id}"))
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::NOT_FOUND, "EVENT_NOT_FOUND", None).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/events/{id}"))
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::NOT_FOUND, "EVENT_NOT_FOUND", None).await;
    Ok(())
}

#[actix_web::test]
async fn event_writes_are_role_gated() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let participant = seed_user(&state, "part", Some(Role::Participant)).await;
    let category = seed_category(&state, "Music").await;

    let req = test::TestRequest::post()
        .uri("/api/events")
        .set_json(event_body(category.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_MISSING_BEARER", None)
        .await;

    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(("Authorization", bearer(&state, &participant)))
        .set_json(event_body(category.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE", None).await;

    // admins inherit organizer rights
    let admin = seed_user(&state, "admin", Some(Role::Admin)).await;
    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(("Authorization", bearer(&state, &admin)))
        .set_json(event_body(category.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    Ok(())
}

#[actix_web::test]
async fn event_input_is_validated() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let organizer = seed_user(&state, "org", Some(Role::Organizer)).await;
    let auth = bearer(&state, &organizer);
    let category = seed_category(&state, "Art").await;

    let cases = [
        ("date", json!("01/09/2099"), "INVALID_DATE"),
        ("time", json!("7pm"), "INVALID_TIME"),
        ("category_id", json!(9999), "INVALID_CATEGORY"),
        ("name", json!("   "), "VALIDATION_ERROR"),
    ];
    for (field, value, code) in cases {
        let mut body = event_body(category.id);
        body[field] = value;
        let req = test::TestRequest::post()
            .uri("/api/events")
            .insert_header(("Authorization", auth.clone()))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, StatusCode::BAD_REQUEST, code, None).await;
    }
    Ok(())
}

#[actix_web::test]
async fn list_filters_by_category_and_dates() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let music = seed_category(&state, "Music").await;
    let sport = seed_category(&state, "Sport").await;
    let gig = seed_event(&state, "Gig", future_date(), &music).await;
    seed_event(&state, "Old Gig", past_date(), &music).await;
    seed_event(&state, "Match", future_date(), &sport).await;

    let req = test::TestRequest::get().uri("/api/events").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["events"].as_array().unwrap().len(), 3);
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_participants"], 0);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/events?category={}&start_date=2050-01-01&end_date=",
            music.id
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], gig.id);
    assert_eq!(events[0]["category"]["name"], "Music");
    assert_eq!(body["filters"]["category"], music.id.to_string());

    let req = test::TestRequest::get()
        .uri("/api/events?end_date=2010-01-01")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["events"][0]["name"], "Old Gig");

    let req = test::TestRequest::get()
        .uri("/api/events?start_date=tomorrow")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::BAD_REQUEST, "INVALID_DATE", None).await;

    let req = test::TestRequest::get()
        .uri("/api/events?category=music")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::BAD_REQUEST, "INVALID_ID", None).await;
    Ok(())
}

#[actix_web::test]
async fn home_searches_name_and_location() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let category = seed_category(&state, "Food").await;
    seed_event(&state, "Taco Night", future_date(), &category).await;
    seed_event(&state, "Wine Tasting", future_date(), &category).await;

    let req = test::TestRequest::get().uri("/api/home").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["events"].as_array().unwrap().len(), 2);
    assert!(body["search"].is_null());

    let req = test::TestRequest::get().uri("/api/home?search=taco").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["search"], "taco");
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["name"], "Taco Night");
    assert_eq!(events[0]["rsvp_count"], 0);

    let req = test::TestRequest::get().uri("/api/home?search=main%20hall").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["events"].as_array().unwrap().len(), 2);
    Ok(())
}

#[actix_web::test]
async fn detail_reports_rsvp_state_for_the_viewer() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let category = seed_category(&state, "Tech").await;
    let upcoming = seed_event(&state, "Hack Day", future_date(), &category).await;
    let finished = seed_event(&state, "Retro", past_date(), &category).await;
    let viewer = seed_user(&state, "viewer", Some(Role::Participant)).await;
    rsvps::create(state.db().unwrap(), viewer.id, upcoming.id, Some("vegan".into())).await?;

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}", upcoming.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["event"]["category"]["name"], "Tech");
    assert_eq!(body["rsvp_stats"]["total_rsvps"], 1);
    assert_eq!(body["has_passed"], false);
    assert_eq!(body["can_rsvp"], true);
    assert!(body["user_rsvp"].is_null());

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}", upcoming.id))
        .insert_header(("Authorization", bearer(&state, &viewer)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user_rsvp"]["notes"], "vegan");

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{}", finished.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["has_passed"], true);
    assert_eq!(body["can_rsvp"], false);

    for bad in ["0", "-4", "abc"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/events/{bad}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, StatusCode::BAD_REQUEST, "INVALID_ID", None).await;
    }
    Ok(())
}

#[actix_web::test]
async fn deleting_an_event_takes_its_rsvps() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let organizer = seed_user(&state, "org", Some(Role::Organizer)).await;
    let guest = seed_user(&state, "guest", Some(Role::Participant)).await;
    let category = seed_category(&state, "Talks").await;
    let event = seed_event(&state, "Keynote", future_date(), &category).await;
    seed_rsvp(&state, &guest, &event, "aisle seat").await;
    seed_registration(&state, &guest, &event).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/events/{}", event.id))
        .insert_header(("Authorization", bearer(&state, &organizer)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let db = state.db().unwrap();
    assert!(rsvps::find_for_user_event(db, guest.id, event.id).await?.is_none());
    assert_eq!(registrations_for_event(&state, event.id).await, 0);
    Ok(())
}

#[actix_web::test]
async fn detail_rejects_bad_tokens_instead_of_going_anonymous() -> Result<(), Box<dyn std::error::Error>> {
    let (state, _mailer) = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await?;
    let category = seed_category(&state, "Tech").await;
    let event = seed_event(&state, "Hack Day", future_date(), &category).await;
    let viewer = seed_user(&state, "viewer", Some(Role::Participant)).await;
    let uri = format!("/api/events/{}", event.id);

    let issued_at = time::OffsetDateTime::now_utc() - time::Duration::hours(2);
    let expired =
        ems_backend::mint_access_token(viewer.id, &viewer.username, issued_at, &state.security)?;
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {expired}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_EXPIRED_JWT", None).await;

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_INVALID_JWT", None).await;

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

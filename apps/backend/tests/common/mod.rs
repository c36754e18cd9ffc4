#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error as ActixError};
use backend_test_support::unique_helpers::{unique_email, unique_username};
use ems_backend::auth::jwt::mint_access_token;
use ems_backend::auth::password::hash_password;
use ems_backend::domain::Role;
use ems_backend::notifications::mailer::RecordingMailer;
use ems_backend::entities::event_registrations;
use ems_backend::repos::categories::{self, Category};
use ems_backend::repos::events::{self, Event, EventWrite};
use ems_backend::repos::roles;
use ems_backend::repos::rsvps::{self, Rsvp};
use ems_backend::repos::users::{self, User, UserCreate};
use ems_backend::state::app_state::AppState;
use ems_backend::test_support::memory_state;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::{json, Value};
use time::macros::{date, time};
use time::OffsetDateTime;

pub const PASSWORD: &str = "Correct-Horse-42";

// Logging is auto-installed for every test binary that declares `mod common;`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Fresh migrated database plus the mailer it delivers into.
pub async fn test_state() -> (AppState, RecordingMailer) {
    let mailer = RecordingMailer::new();
    let state = memory_state(&mailer)
        .await
        .expect("in-memory state should build");
    (state, mailer)
}

/// Insert an active, verified user holding `role` (none when `None`).
pub async fn seed_user(state: &AppState, prefix: &str, role: Option<Role>) -> User {
    let db = state.db().expect("state has a database");
    let user = users::create_user(
        db,
        UserCreate {
            username: unique_username(prefix),
            email: unique_email(prefix),
            password_hash: hash_password(PASSWORD).expect("hash"),
            first_name: "Test".to_string(),
            last_name: prefix.to_string(),
            is_superuser: false,
            email_verified: true,
        },
    )
    .await
    .expect("create user");
    if let Some(role) = role {
        roles::assign_role(db, user.id, role)
            .await
            .expect("assign role");
    }
    user
}

pub async fn seed_superuser(state: &AppState, prefix: &str) -> User {
    let user = seed_user(state, prefix, None).await;
    let db = state.db().expect("state has a database");
    users::set_superuser(db, user.id, true)
        .await
        .expect("promote to superuser");
    users::find_user_by_id(db, user.id)
        .await
        .expect("reload")
        .expect("user exists")
}

pub async fn seed_category(state: &AppState, name: &str) -> Category {
    let db = state.db().expect("state has a database");
    categories::create(db, name.to_string(), format!("{name} events"))
        .await
        .expect("create category")
}

/// Event on `date` at 18:30 UTC in `category`.
pub async fn seed_event(
    state: &AppState,
    name: &str,
    date: time::Date,
    category: &Category,
) -> Event {
    let db = state.db().expect("state has a database");
    events::create(
        db,
        EventWrite {
            name: name.to_string(),
            description: format!("About {name}"),
            date,
            time: time!(18:30),
            location: "Main Hall".to_string(),
            category_id: category.id,
        },
        None,
    )
    .await
    .expect("create event")
}

pub async fn seed_rsvp(state: &AppState, user: &User, event: &Event, notes: &str) -> Rsvp {
    let db = state.db().expect("state has a database");
    rsvps::create(db, user.id, event.id, Some(notes.to_string()))
        .await
        .expect("create rsvp")
}

/// Legacy registration row; the API never creates these any more.
pub async fn seed_registration(state: &AppState, user: &User, event: &Event) {
    let db = state.db().expect("state has a database");
    event_registrations::ActiveModel {
        user_id: Set(user.id),
        event_id: Set(event.id),
        registered_at: Set(OffsetDateTime::now_utc()),
        attended: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("create registration");
}

pub async fn registrations_for_event(state: &AppState, event_id: i64) -> u64 {
    let db = state.db().expect("state has a database");
    event_registrations::Entity::find()
        .filter(event_registrations::Column::EventId.eq(event_id))
        .count(db)
        .await
        .expect("count registrations")
}

pub async fn registrations_for_user(state: &AppState, user_id: i64) -> u64 {
    let db = state.db().expect("state has a database");
    event_registrations::Entity::find()
        .filter(event_registrations::Column::UserId.eq(user_id))
        .count(db)
        .await
        .expect("count registrations")
}

pub fn future_date() -> time::Date {
    date!(2099 - 06 - 15)
}

pub fn past_date() -> time::Date {
    date!(2001 - 03 - 10)
}

pub fn bearer(state: &AppState, user: &User) -> String {
    let token = mint_access_token(user.id, &user.username, OffsetDateTime::now_utc(), &state.security)
        .expect("mint token");
    format!("Bearer {token}")
}

/// Pull the activation path (`/api/accounts/activate/{uid}/{token}`) out of
/// the newest email sent to `email`.
pub fn activation_path(mailer: &RecordingMailer, email: &str) -> String {
    let latest = mailer
        .sent_to(email)
        .pop()
        .expect("an activation email was sent");
    let start = latest
        .body
        .find("/api/accounts/activate/")
        .expect("body contains an activation link");
    latest.body[start..]
        .split_whitespace()
        .next()
        .expect("link is non-empty")
        .to_string()
}

pub fn signup_body(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": PASSWORD,
        "password_confirm": PASSWORD,
        "first_name": "Ada",
        "last_name": "Lovelace"
    })
}

/// Sign up through the API, follow the emailed link, then log in.
/// Returns the `Authorization` header value.
pub async fn signup_activate_login<S, B>(app: &S, mailer: &RecordingMailer, prefix: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = ActixError>,
    B: MessageBody,
{
    let username = unique_username(prefix);
    let email = unique_email(prefix);

    let req = test::TestRequest::post()
        .uri("/api/accounts/signup")
        .set_json(signup_body(&username, &email))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "signup should succeed");

    let req = test::TestRequest::get()
        .uri(&activation_path(mailer, &email))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "activation should succeed");

    let req = test::TestRequest::post()
        .uri("/api/accounts/login")
        .set_json(json!({ "username": username, "password": PASSWORD }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    format!("Bearer {}", body["token"].as_str().expect("token in body"))
}

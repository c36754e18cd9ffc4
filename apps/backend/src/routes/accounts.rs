//! Account lifecycle endpoints under `/api/accounts`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::OffsetDateTime;

use super::views::{MessageResponse, UserView};
use crate::auth::activation;
use crate::auth::jwt::mint_access_token;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::services::accounts::{AccountService, ProfileChanges, SignupInput};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignupResponse {
    message: &'static str,
    user: UserView,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    token_type: &'static str,
    expires_in: i64,
    user: UserView,
}

#[derive(Debug, Deserialize)]
pub struct ResendActivationRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    // None = not provided, Some(None) = null (clear), Some(Some(_)) = set
    #[serde(default, with = "double_option")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub bio: Option<Option<String>>,
}

async fn signup(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: ValidatedJson<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = SignupInput {
        username: body.username,
        email: body.email,
        password: body.password,
        password_confirm: body.password_confirm,
        first_name: body.first_name,
        last_name: body.last_name,
    };

    let created = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { AccountService::new().signup(txn, input).await })
    })
    .await?;

    app_state
        .notifier()
        .activation(
            &created.user,
            &activation::encode_uid(created.user.id),
            &created.activation.token,
        )
        .await;

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "Account created. Check your email to activate it.",
        user: UserView::new(created.user, &created.roles),
    }))
}

async fn activate(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (uidb64, token) = path.into_inner();
    let now = OffsetDateTime::now_utc();

    with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            AccountService::new()
                .activate(txn, &uidb64, &token, now)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Your account has been activated. You can now log in.",
    }))
}

/// Always 202 so the response does not reveal whether the address exists.
async fn resend_activation(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ResendActivationRequest>,
) -> Result<HttpResponse, AppError> {
    let email = body.into_inner().email;

    let reissued = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { AccountService::new().resend_activation(txn, &email).await })
    })
    .await?;

    if let Some((user, issued)) = reissued {
        app_state
            .notifier()
            .activation_reminder(&user, &activation::encode_uid(user.id), &issued.token)
            .await;
    }

    Ok(HttpResponse::Accepted().json(MessageResponse {
        message: "If an inactive account uses this address, a new activation link has been sent.",
    }))
}

async fn login(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { username, password } = body.into_inner();
    let now = OffsetDateTime::now_utc();

    let (user, roles) = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            AccountService::new()
                .login(txn, &username, &password, now)
                .await
        })
    })
    .await?;

    let token = mint_access_token(user.id, &user.username, now, &app_state.security)?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: app_state.security.token_ttl.whole_seconds(),
        user: UserView::new(user, &roles),
    }))
}

/// Tokens are stateless; the client drops its copy.
async fn logout(_current_user: CurrentUser) -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn profile(current_user: CurrentUser) -> HttpResponse {
    let CurrentUser { user, roles } = current_user;
    HttpResponse::Ok().json(UserView::new(user, &roles))
}

async fn update_profile(
    req: HttpRequest,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let changes = ProfileChanges {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone_number: payload.phone_number,
        address: payload.address,
        bio: payload.bio,
    };
    let user_id = current_user.id();

    let user = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            AccountService::new()
                .update_profile(txn, user_id, changes)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(UserView::new(user, &current_user.roles)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .route("/activate/{uidb64}/{token}", web::get().to(activate))
        .route("/resend-activation", web::post().to(resend_activation))
        .service(
            web::resource("/profile")
                .route(web::get().to(profile))
                .route(web::patch().to(update_profile)),
        );
}

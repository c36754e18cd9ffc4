//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::users_sea as users_adapter;
pub use crate::adapters::users_sea::{ProfileUpdate, UserCreate};
use crate::errors::domain::DomainError;

/// User domain model. Secrets live in `UserSecrets`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub email_verified: bool,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    /// "first last", or the username when both are blank.
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_owned()
        }
    }
}

/// Credential material that must never leave the service.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSecrets {
    pub password_hash: String,
    pub verification_digest: Option<String>,
    pub verification_sent_at: Option<OffsetDateTime>,
}

fn split(model: crate::entities::users::Model) -> (User, UserSecrets) {
    let secrets = UserSecrets {
        password_hash: model.password_hash.clone(),
        verification_digest: model.email_verification_token.clone(),
        verification_sent_at: model.email_verification_sent_at,
    };
    (User::from(model), secrets)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_username(conn, username).await?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_email(conn, email).await?;
    Ok(user.map(User::from))
}

pub async fn find_with_secrets<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<(User, UserSecrets)>, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id).await?;
    Ok(user.map(split))
}

pub async fn find_by_username_with_secrets<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<(User, UserSecrets)>, DomainError> {
    let user = users_adapter::find_user_by_username(conn, username).await?;
    Ok(user.map(split))
}

pub async fn find_first_superuser<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_first_superuser(conn).await?;
    Ok(user.map(User::from))
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<User>, DomainError> {
    let users = users_adapter::list_users(conn).await?;
    Ok(users.into_iter().map(User::from).collect())
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    update: ProfileUpdate,
) -> Result<User, DomainError> {
    let user = users_adapter::update_profile(conn, user_id, update).await?;
    Ok(User::from(user))
}

pub async fn set_verification_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    digest: String,
    sent_at: OffsetDateTime,
) -> Result<(), DomainError> {
    users_adapter::set_verification_token(conn, user_id, digest, sent_at).await?;
    Ok(())
}

pub async fn mark_email_verified<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), DomainError> {
    users_adapter::mark_email_verified(conn, user_id).await?;
    Ok(())
}

pub async fn touch_last_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    at: OffsetDateTime,
) -> Result<(), DomainError> {
    users_adapter::touch_last_login(conn, user_id, at).await?;
    Ok(())
}

pub async fn set_superuser<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    is_superuser: bool,
) -> Result<(), DomainError> {
    users_adapter::set_superuser(conn, user_id, is_superuser).await?;
    Ok(())
}

/// `true` when a row was removed.
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DomainError> {
    Ok(users_adapter::delete_user(conn, user_id).await? > 0)
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            bio: model.bio,
            address: model.address,
            is_active: model.is_active,
            is_superuser: model.is_superuser,
            email_verified: model.email_verified,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

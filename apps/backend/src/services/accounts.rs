//! Signup, activation, login and profile maintenance.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::activation::{self, IssuedToken};
use crate::auth::password;
use crate::domain::{validation, Role};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::users::{self, ProfileUpdate, User, UserCreate};
use crate::repos::roles;

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A new account and the activation token to email once committed.
#[derive(Debug, Clone)]
pub struct Signup {
    pub user: User,
    pub roles: Vec<Role>,
    pub activation: IssuedToken,
}

/// Profile fields a user may change. Nullable fields use double options:
/// `None` = unchanged, `Some(None)` = clear.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub bio: Option<Option<String>>,
}

impl ProfileChanges {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.bio.is_none()
    }
}

fn invalid_activation() -> AppError {
    DomainError::validation(
        ValidationKind::InvalidActivationToken,
        "Activation link is invalid or has expired",
    )
    .into()
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized(ErrorCode::InvalidCredentials, "Invalid username or password")
}

/// Blank input becomes `None`.
fn nullable(field: &str, raw: Option<String>, max: Option<usize>) -> Result<Option<String>, DomainError> {
    match raw {
        None => Ok(None),
        Some(v) => {
            let v = validation::optional_text(field, &v, max)?;
            Ok((!v.is_empty()).then_some(v))
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AccountService;

impl AccountService {
    pub fn new() -> Self {
        Self
    }

    /// Create an unverified account with the Participant role and a fresh
    /// activation token.
    pub async fn signup<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        input: SignupInput,
    ) -> Result<Signup, AppError> {
        let username = validation::username(&input.username)?;
        let email = validation::email(&input.email)?;
        validation::password(&input.password, &input.password_confirm)?;
        let first_name = validation::optional_text(
            "First name",
            input.first_name.as_deref().unwrap_or_default(),
            Some(validation::NAME_MAX),
        )?;
        let last_name = validation::optional_text(
            "Last name",
            input.last_name.as_deref().unwrap_or_default(),
            Some(validation::NAME_MAX),
        )?;

        ensure_available(conn, &username, &email).await?;

        let password_hash = password::hash_password(&input.password)?;
        let user = users::create_user(
            conn,
            UserCreate {
                username,
                email,
                password_hash,
                first_name,
                last_name,
                is_superuser: false,
                email_verified: false,
            },
        )
        .await?;

        roles::assign_role(conn, user.id, Role::Participant).await?;

        let activation = activation::issue();
        users::set_verification_token(
            conn,
            user.id,
            activation.digest.clone(),
            OffsetDateTime::now_utc(),
        )
        .await?;

        info!(user_id = user.id, email = %Redacted(&user.email), "user signed up");
        Ok(Signup {
            user,
            roles: vec![Role::Participant],
            activation,
        })
    }

    /// Verify the emailed token. Already verified accounts succeed as-is.
    pub async fn activate<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        uidb64: &str,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<User, AppError> {
        let user_id = activation::decode_uid(uidb64).ok_or_else(invalid_activation)?;
        let (user, secrets) = users::find_with_secrets(conn, user_id)
            .await?
            .ok_or_else(invalid_activation)?;

        if user.email_verified {
            return Ok(user);
        }

        let valid = match (&secrets.verification_digest, secrets.verification_sent_at) {
            (Some(digest), Some(sent_at)) => {
                activation::matches(token, digest) && !activation::is_expired(sent_at, now)
            }
            _ => false,
        };
        if !valid {
            debug!(user_id, "activation rejected");
            return Err(invalid_activation());
        }

        users::mark_email_verified(conn, user_id).await?;
        info!(user_id, "account activated");
        users::find_user_by_id(conn, user_id)
            .await?
            .ok_or_else(invalid_activation)
    }

    /// Rotate the token of an unverified account. `None` when there is
    /// nothing to send; callers must not reveal which case occurred.
    pub async fn resend_activation<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<(User, IssuedToken)>, AppError> {
        let Ok(email) = validation::email(email) else {
            return Ok(None);
        };
        let Some(user) = users::find_user_by_email(conn, &email).await? else {
            return Ok(None);
        };
        if user.email_verified {
            return Ok(None);
        }

        let issued = activation::issue();
        users::set_verification_token(conn, user.id, issued.digest.clone(), OffsetDateTime::now_utc())
            .await?;
        Ok(Some((user, issued)))
    }

    /// Check credentials and account state, then stamp `last_login`.
    pub async fn login<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        username: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<(User, Vec<Role>), AppError> {
        let Some((user, secrets)) =
            users::find_by_username_with_secrets(conn, username.trim()).await?
        else {
            password::verify_dummy(password);
            return Err(invalid_credentials());
        };

        if !password::verify_password(password, &secrets.password_hash) {
            return Err(invalid_credentials());
        }
        if !user.is_active {
            return Err(AppError::forbidden(
                ErrorCode::AccountDisabled,
                "This account has been disabled",
            ));
        }
        if !user.email_verified {
            return Err(AppError::forbidden(
                ErrorCode::AccountNotActivated,
                "Please activate your account using the link sent to your email",
            ));
        }

        users::touch_last_login(conn, user.id, now).await?;
        let roles = roles::roles_for_user(conn, user.id).await?;
        let user = User {
            last_login: Some(now),
            ..user
        };
        Ok((user, roles))
    }

    pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<User, AppError> {
        if changes.is_empty() {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                "Provide at least one field to update",
            ));
        }

        let first_name = changes
            .first_name
            .map(|v| validation::optional_text("First name", &v, Some(validation::NAME_MAX)))
            .transpose()?;
        let last_name = changes
            .last_name
            .map(|v| validation::optional_text("Last name", &v, Some(validation::NAME_MAX)))
            .transpose()?;
        let phone_number = match changes.phone_number {
            Some(Some(raw)) if !raw.trim().is_empty() => {
                Some(Some(validation::phone_number(&raw)?))
            }
            Some(_) => Some(None),
            None => None,
        };
        let address = changes
            .address
            .map(|v| nullable("Address", v, None))
            .transpose()?;
        let bio = changes
            .bio
            .map(|v| nullable("Bio", v, Some(validation::BIO_MAX)))
            .transpose()?;

        let user = users::update_profile(
            conn,
            user_id,
            ProfileUpdate {
                first_name,
                last_name,
                phone_number,
                address,
                bio,
            },
        )
        .await?;
        Ok(user)
    }

    /// Operator bootstrap: an active, verified superuser in the Admin group.
    /// Password strength rules apply; no activation email is involved.
    pub async fn create_superuser<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let username = validation::username(username)?;
        let email = validation::email(email)?;
        validation::password(password, password)?;
        ensure_available(conn, &username, &email).await?;

        let user = users::create_user(
            conn,
            UserCreate {
                username,
                email,
                password_hash: password::hash_password(password)?,
                first_name: String::new(),
                last_name: String::new(),
                is_superuser: true,
                email_verified: true,
            },
        )
        .await?;
        roles::assign_role(conn, user.id, Role::Admin).await?;

        info!(user_id = user.id, "superuser created");
        Ok(user)
    }
}

async fn ensure_available<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
    email: &str,
) -> Result<(), AppError> {
    if users::find_user_by_username(conn, username).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::UsernameTaken,
            "A user with that username already exists",
        )
        .into());
    }
    if users::find_user_by_email(conn, email).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::EmailTaken,
            "A user with that email already exists",
        )
        .into());
    }
    Ok(())
}

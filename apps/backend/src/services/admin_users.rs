use sea_orm::ConnectionTrait;
use tracing::info;

use crate::domain::{primary_role, Role};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::roles;
use crate::repos::users::{self, User};

fn user_not_found(id: i64) -> AppError {
    DomainError::not_found(NotFoundKind::User, format!("User {id} not found")).into()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AdminUserService;

impl AdminUserService {
    pub fn new() -> Self {
        Self
    }

    /// Deletes the user and, by cascade, their RSVPs and memberships.
    pub async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<(), AppError> {
        if !users::delete_user(conn, user_id).await? {
            return Err(user_not_found(user_id));
        }
        info!(user_id, "user deleted by admin");
        Ok(())
    }

    /// The user and their primary role, if any.
    pub async fn current_role<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<(User, Option<Role>), AppError> {
        let user = users::find_user_by_id(conn, user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;
        let held = roles::roles_for_user(conn, user_id).await?;
        Ok((user, primary_role(&held)))
    }

    /// Replace every membership with `role`.
    pub async fn update_role<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        role: &str,
    ) -> Result<(User, Role), AppError> {
        let role: Role = role.parse()?;
        let user = users::find_user_by_id(conn, user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;
        roles::set_only_role(conn, user_id, role).await?;
        info!(user_id, role = %role, "user role updated");
        Ok((user, role))
    }

    /// Put the named user, or the first superuser when no name is given,
    /// into the Admin group. Existing memberships are kept.
    pub async fn assign_admin<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        username: Option<&str>,
    ) -> Result<User, AppError> {
        let user = match username {
            Some(name) => users::find_user_by_username(conn, name.trim()).await?,
            None => users::find_first_superuser(conn).await?,
        }
        .ok_or_else(|| {
            AppError::from(DomainError::not_found(
                NotFoundKind::User,
                match username {
                    Some(name) => format!("No user named '{name}'"),
                    None => "No superuser exists; create one first".to_string(),
                },
            ))
        })?;
        roles::assign_role(conn, user.id, Role::Admin).await?;
        info!(user_id = user.id, "admin role assigned");
        Ok(user)
    }
}

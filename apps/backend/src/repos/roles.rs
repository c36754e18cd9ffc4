//! Group membership repository.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use crate::adapters::roles_sea;
use crate::domain::Role;
use crate::errors::domain::DomainError;

/// Groups held by a user, highest precedence first. Unknown group names in
/// the table are ignored.
pub async fn roles_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Role>, DomainError> {
    let names = roles_sea::role_names_for_user(conn, user_id).await?;
    let mut roles: Vec<Role> = names.iter().filter_map(|n| n.parse().ok()).collect();
    roles.sort();
    Ok(roles)
}

/// Every user's groups keyed by user id.
pub async fn memberships<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<HashMap<i64, Vec<Role>>, DomainError> {
    let mut out: HashMap<i64, Vec<Role>> = HashMap::new();
    for (user_id, name) in roles_sea::all_memberships(conn).await? {
        if let Ok(role) = name.parse::<Role>() {
            out.entry(user_id).or_default().push(role);
        }
    }
    for roles in out.values_mut() {
        roles.sort();
    }
    Ok(out)
}

/// Make sure every known group exists. Returns `(role, created)` per group.
pub async fn ensure_roles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(Role, bool)>, DomainError> {
    let mut out = Vec::with_capacity(Role::ALL.len());
    for role in Role::ALL {
        let (_, created) = roles_sea::ensure_role(conn, role.as_str()).await?;
        out.push((role, created));
    }
    Ok(out)
}

/// Add `role` to the user's groups (no-op when already a member).
pub async fn assign_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    role: Role,
) -> Result<(), DomainError> {
    let (row, _) = roles_sea::ensure_role(conn, role.as_str()).await?;
    roles_sea::add_user_role(conn, user_id, row.id).await?;
    Ok(())
}

/// Replace all memberships with exactly `role`.
pub async fn set_only_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    role: Role,
) -> Result<(), DomainError> {
    roles_sea::clear_user_roles(conn, user_id).await?;
    assign_role(conn, user_id, role).await
}

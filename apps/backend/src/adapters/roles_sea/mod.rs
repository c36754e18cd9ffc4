//! SeaORM adapter for groups and group membership.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, NotSet, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use time::OffsetDateTime;

use crate::entities::{roles, user_roles};

pub async fn find_role_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<roles::Model>, sea_orm::DbErr> {
    roles::Entity::find()
        .filter(roles::Column::Name.eq(name))
        .one(conn)
        .await
}

/// Insert the role when missing. Returns the row and whether it was created.
pub async fn ensure_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<(roles::Model, bool), sea_orm::DbErr> {
    if let Some(existing) = find_role_by_name(conn, name).await? {
        return Ok((existing, false));
    }
    let created = roles::ActiveModel {
        id: NotSet,
        name: Set(name.to_owned()),
    }
    .insert(conn)
    .await?;
    Ok((created, true))
}

/// Role names held by one user, lowest role id first.
pub async fn role_names_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<String>, sea_orm::DbErr> {
    roles::Entity::find()
        .select_only()
        .column(roles::Column::Name)
        .join(JoinType::InnerJoin, roles::Relation::UserRoles.def())
        .filter(user_roles::Column::UserId.eq(user_id))
        .order_by_asc(roles::Column::Id)
        .into_tuple::<String>()
        .all(conn)
        .await
}

/// `(user_id, role name)` for every membership.
pub async fn all_memberships<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(i64, String)>, sea_orm::DbErr> {
    user_roles::Entity::find()
        .select_only()
        .column(user_roles::Column::UserId)
        .column(roles::Column::Name)
        .join(JoinType::InnerJoin, user_roles::Relation::Role.def())
        .order_by_asc(user_roles::Column::UserId)
        .order_by_asc(roles::Column::Id)
        .into_tuple::<(i64, String)>()
        .all(conn)
        .await
}

/// Idempotent: an existing membership is left alone.
pub async fn add_user_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    role_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let link = user_roles::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        role_id: Set(role_id),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    user_roles::Entity::insert(link)
        .on_conflict(
            OnConflict::columns([user_roles::Column::UserId, user_roles::Column::RoleId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

pub async fn clear_user_roles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = user_roles::Entity::delete_many()
        .filter(user_roles::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

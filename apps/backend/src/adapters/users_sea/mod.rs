//! SeaORM adapter for users.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::users;

pub mod dto;

pub use dto::{ProfileUpdate, UserCreate};

// Adapter functions return DbErr; repos map to DomainError.

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: NotSet,
        username: Set(dto.username),
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        first_name: Set(dto.first_name),
        last_name: Set(dto.last_name),
        phone_number: Set(None),
        bio: Set(None),
        address: Set(None),
        is_active: Set(true),
        is_superuser: Set(dto.is_superuser),
        email_verified: Set(dto.email_verified),
        email_verification_token: Set(None),
        email_verification_sent_at: Set(None),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    user_active.insert(conn).await
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn find_user_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(conn)
        .await
}

/// Case-insensitive; stored emails are lowercase but older rows may not be.
pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(users::Column::Email))).eq(email.to_lowercase()))
        .one(conn)
        .await
}

pub async fn find_first_superuser<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::IsSuperuser.eq(true))
        .order_by_asc(users::Column::Id)
        .one(conn)
        .await
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::Username)
        .all(conn)
        .await
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: ProfileUpdate,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut active = users::ActiveModel {
        id: Set(user_id),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    if let Some(first_name) = dto.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = dto.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone_number) = dto.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(address) = dto.address {
        active.address = Set(address);
    }
    if let Some(bio) = dto.bio {
        active.bio = Set(bio);
    }
    active.update(conn).await
}

/// Store a fresh activation digest and its issue time.
pub async fn set_verification_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    digest: String,
    sent_at: OffsetDateTime,
) -> Result<(), sea_orm::DbErr> {
    let active = users::ActiveModel {
        id: Set(user_id),
        email_verification_token: Set(Some(digest)),
        email_verification_sent_at: Set(Some(sent_at)),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    active.update(conn).await?;
    Ok(())
}

pub async fn mark_email_verified<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let active = users::ActiveModel {
        id: Set(user_id),
        email_verified: Set(true),
        email_verification_token: Set(None),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    active.update(conn).await?;
    Ok(())
}

pub async fn touch_last_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    at: OffsetDateTime,
) -> Result<(), sea_orm::DbErr> {
    let active = users::ActiveModel {
        id: Set(user_id),
        last_login: Set(Some(at)),
        ..Default::default()
    };
    active.update(conn).await?;
    Ok(())
}

pub async fn set_superuser<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    is_superuser: bool,
) -> Result<(), sea_orm::DbErr> {
    let active = users::ActiveModel {
        id: Set(user_id),
        is_superuser: Set(is_superuser),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    active.update(conn).await?;
    Ok(())
}

/// Rows removed (0 or 1). RSVPs, registrations, role links and created
/// events go with the user through ON DELETE CASCADE.
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = users::Entity::delete_by_id(user_id).exec(conn).await?;
    Ok(res.rows_affected)
}

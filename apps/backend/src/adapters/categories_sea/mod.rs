//! SeaORM adapter for categories.

use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{categories, events};

pub async fn list_categories<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<categories::Model>, sea_orm::DbErr> {
    categories::Entity::find()
        .order_by_asc(categories::Column::Name)
        .all(conn)
        .await
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<Vec<categories::Model>, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    categories::Entity::find()
        .filter(categories::Column::Id.is_in(ids))
        .all(conn)
        .await
}

/// Events per category id; categories without events are absent.
pub async fn event_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<HashMap<i64, i64>, sea_orm::DbErr> {
    let rows = events::Entity::find()
        .select_only()
        .column(events::Column::CategoryId)
        .column_as(Expr::col(events::Column::Id).count(), "event_count")
        .group_by(events::Column::CategoryId)
        .into_tuple::<(i64, i64)>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().collect())
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<categories::Model>, sea_orm::DbErr> {
    categories::Entity::find_by_id(id).one(conn).await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: String,
    description: String,
) -> Result<categories::Model, sea_orm::DbErr> {
    categories::ActiveModel {
        id: NotSet,
        name: Set(name),
        description: Set(description),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    name: String,
    description: String,
) -> Result<categories::Model, sea_orm::DbErr> {
    categories::ActiveModel {
        id: Set(id),
        name: Set(name),
        description: Set(description),
    }
    .update(conn)
    .await
}

/// Rows removed; the category's events cascade.
pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = categories::Entity::delete_by_id(id).exec(conn).await?;
    Ok(res.rows_affected)
}

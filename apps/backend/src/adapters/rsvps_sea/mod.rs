//! SeaORM adapter for RSVPs.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::{events, rsvps, users};

pub async fn find_for_user_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    event_id: i64,
) -> Result<Option<rsvps::Model>, sea_orm::DbErr> {
    rsvps::Entity::find()
        .filter(rsvps::Column::UserId.eq(user_id))
        .filter(rsvps::Column::EventId.eq(event_id))
        .one(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    event_id: i64,
    notes: Option<String>,
) -> Result<rsvps::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    rsvps::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        event_id: Set(event_id),
        notes: Set(notes),
        rsvp_date: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update_notes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    notes: Option<String>,
) -> Result<rsvps::Model, sea_orm::DbErr> {
    rsvps::ActiveModel {
        id: Set(id),
        notes: Set(notes),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    }
    .update(conn)
    .await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = rsvps::Entity::delete_by_id(id).exec(conn).await?;
    Ok(res.rows_affected)
}

pub async fn count_for_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    rsvps::Entity::find()
        .filter(rsvps::Column::EventId.eq(event_id))
        .count(conn)
        .await
}

/// Users holding at least one RSVP.
pub async fn count_distinct_participants<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<i64, sea_orm::DbErr> {
    let count = rsvps::Entity::find()
        .select_only()
        .column_as(Expr::col(rsvps::Column::UserId).count_distinct(), "participants")
        .into_tuple::<i64>()
        .one(conn)
        .await?;
    Ok(count.unwrap_or(0))
}

/// Users holding at least one RSVP, ordered by first name, last name, username.
pub async fn participants<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(
            users::Column::Id.in_subquery(
                Query::select()
                    .column(rsvps::Column::UserId)
                    .from(rsvps::Entity)
                    .to_owned(),
            ),
        )
        .order_by_asc(users::Column::FirstName)
        .order_by_asc(users::Column::LastName)
        .order_by_asc(users::Column::Username)
        .all(conn)
        .await
}

/// One user's RSVPs with their events, earliest event first.
pub async fn list_for_user_with_events<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<(rsvps::Model, events::Model)>, sea_orm::DbErr> {
    let rows = rsvps::Entity::find()
        .filter(rsvps::Column::UserId.eq(user_id))
        .find_also_related(events::Entity)
        .order_by_asc(events::Column::Date)
        .order_by_asc(events::Column::Time)
        .order_by_asc(rsvps::Column::Id)
        .all(conn)
        .await?;
    // the FK guarantees the event; filter_map keeps the types honest
    Ok(rows
        .into_iter()
        .filter_map(|(rsvp, event)| event.map(|e| (rsvp, e)))
        .collect())
}

/// RSVPs per user id across all events.
pub async fn counts_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<HashMap<i64, i64>, sea_orm::DbErr> {
    let rows = rsvps::Entity::find()
        .select_only()
        .column(rsvps::Column::UserId)
        .column_as(Expr::col(rsvps::Column::Id).count(), "rsvp_count")
        .group_by(rsvps::Column::UserId)
        .into_tuple::<(i64, i64)>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().collect())
}

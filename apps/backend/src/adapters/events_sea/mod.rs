//! SeaORM adapter for events.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use time::OffsetDateTime;

use crate::entities::{event_registrations, events, rsvps};

pub mod dto;

pub use dto::{DateWindow, EventFilter, EventWrite};

/// `%needle%` with LIKE metacharacters escaped by `\`.
fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn ilike(column: events::Column, pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn apply_filter(mut query: Select<events::Entity>, filter: &EventFilter) -> Select<events::Entity> {
    if let Some(category_id) = filter.category_id {
        query = query.filter(events::Column::CategoryId.eq(category_id));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(events::Column::Date.gte(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(events::Column::Date.lte(end));
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        query = query.filter(
            Condition::any()
                .add(ilike(events::Column::Name, &pattern))
                .add(ilike(events::Column::Location, &pattern)),
        );
    }
    query
}

fn apply_window(query: Select<events::Entity>, window: DateWindow) -> Select<events::Entity> {
    match window {
        DateWindow::All => query,
        DateWindow::Upcoming(today) => query.filter(events::Column::Date.gt(today)),
        DateWindow::Past(today) => query.filter(events::Column::Date.lt(today)),
        DateWindow::On(today) => query.filter(events::Column::Date.eq(today)),
    }
}

/// Filtered events in calendar order.
pub async fn list_events<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &EventFilter,
) -> Result<Vec<events::Model>, sea_orm::DbErr> {
    apply_filter(events::Entity::find(), filter)
        .order_by_asc(events::Column::Date)
        .order_by_asc(events::Column::Time)
        .order_by_asc(events::Column::Id)
        .all(conn)
        .await
}

pub async fn list_in_window<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    window: DateWindow,
) -> Result<Vec<events::Model>, sea_orm::DbErr> {
    apply_window(events::Entity::find(), window)
        .order_by_asc(events::Column::Date)
        .order_by_asc(events::Column::Time)
        .order_by_asc(events::Column::Id)
        .all(conn)
        .await
}

pub async fn count_in_window<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    window: DateWindow,
) -> Result<u64, sea_orm::DbErr> {
    apply_window(events::Entity::find(), window).count(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<events::Model>, sea_orm::DbErr> {
    events::Entity::find_by_id(id).one(conn).await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: EventWrite,
    created_by: Option<i64>,
) -> Result<events::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    events::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        description: Set(dto.description),
        date: Set(dto.date),
        time: Set(dto.time),
        location: Set(dto.location),
        category_id: Set(dto.category_id),
        created_by: Set(created_by),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: EventWrite,
) -> Result<events::Model, sea_orm::DbErr> {
    events::ActiveModel {
        id: Set(id),
        name: Set(dto.name),
        description: Set(dto.description),
        date: Set(dto.date),
        time: Set(dto.time),
        location: Set(dto.location),
        category_id: Set(dto.category_id),
        created_by: NotSet,
        created_at: NotSet,
        updated_at: Set(OffsetDateTime::now_utc()),
    }
    .update(conn)
    .await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = events::Entity::delete_by_id(id).exec(conn).await?;
    Ok(res.rows_affected)
}

/// RSVPs per event id, restricted to `ids`. Events without RSVPs are absent.
pub async fn rsvp_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<HashMap<i64, i64>, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = rsvps::Entity::find()
        .select_only()
        .column(rsvps::Column::EventId)
        .column_as(Expr::col(rsvps::Column::Id).count(), "rsvp_count")
        .filter(rsvps::Column::EventId.is_in(ids))
        .group_by(rsvps::Column::EventId)
        .into_tuple::<(i64, i64)>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Legacy registrations per event id, restricted to `ids`.
pub async fn registration_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<HashMap<i64, i64>, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = event_registrations::Entity::find()
        .select_only()
        .column(event_registrations::Column::EventId)
        .column_as(
            Expr::col(event_registrations::Column::Id).count(),
            "registration_count",
        )
        .filter(event_registrations::Column::EventId.is_in(ids))
        .group_by(event_registrations::Column::EventId)
        .into_tuple::<(i64, i64)>()
        .all(conn)
        .await?;
    Ok(rows.into_iter().collect())
}

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use time::{Date, OffsetDateTime, Time};

use crate::adapters::events_sea;
pub use crate::adapters::events_sea::{DateWindow, EventFilter, EventWrite};
use crate::domain::schedule;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date: Date,
    pub time: Time,
    pub location: String,
    pub category_id: i64,
    pub created_by: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Event {
    pub fn has_passed(&self, now: OffsetDateTime) -> bool {
        schedule::has_passed(self.date, self.time, now)
    }

    pub fn can_rsvp(&self, now: OffsetDateTime) -> bool {
        !self.has_passed(now)
    }
}

fn into_events(rows: Vec<crate::entities::events::Model>) -> Vec<Event> {
    rows.into_iter().map(Event::from).collect()
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &EventFilter,
) -> Result<Vec<Event>, DomainError> {
    Ok(into_events(events_sea::list_events(conn, filter).await?))
}

pub async fn list_in_window<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    window: DateWindow,
) -> Result<Vec<Event>, DomainError> {
    Ok(into_events(events_sea::list_in_window(conn, window).await?))
}

pub async fn count_in_window<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    window: DateWindow,
) -> Result<u64, DomainError> {
    Ok(events_sea::count_in_window(conn, window).await?)
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Event>, DomainError> {
    Ok(events_sea::find_by_id(conn, id).await?.map(Event::from))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: EventWrite,
    created_by: Option<i64>,
) -> Result<Event, DomainError> {
    Ok(events_sea::create(conn, dto, created_by).await?.into())
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: EventWrite,
) -> Result<Event, DomainError> {
    Ok(events_sea::update(conn, id, dto).await?.into())
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<bool, DomainError> {
    Ok(events_sea::delete(conn, id).await? > 0)
}

pub async fn rsvp_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<HashMap<i64, i64>, DomainError> {
    Ok(events_sea::rsvp_counts(conn, ids).await?)
}

pub async fn registration_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<HashMap<i64, i64>, DomainError> {
    Ok(events_sea::registration_counts(conn, ids).await?)
}

impl From<crate::entities::events::Model> for Event {
    fn from(model: crate::entities::events::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            date: model.date,
            time: model.time,
            location: model.location,
            category_id: model.category_id,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::rsvps_sea;
use crate::errors::domain::DomainError;
use crate::repos::events::Event;
use crate::repos::users::User;

#[derive(Debug, Clone, PartialEq)]
pub struct Rsvp {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub notes: Option<String>,
    pub rsvp_date: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn find_for_user_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    event_id: i64,
) -> Result<Option<Rsvp>, DomainError> {
    Ok(rsvps_sea::find_for_user_event(conn, user_id, event_id)
        .await?
        .map(Rsvp::from))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    event_id: i64,
    notes: Option<String>,
) -> Result<Rsvp, DomainError> {
    Ok(rsvps_sea::create(conn, user_id, event_id, notes).await?.into())
}

pub async fn update_notes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    notes: Option<String>,
) -> Result<Rsvp, DomainError> {
    Ok(rsvps_sea::update_notes(conn, id, notes).await?.into())
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<bool, DomainError> {
    Ok(rsvps_sea::delete(conn, id).await? > 0)
}

pub async fn count_for_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
) -> Result<u64, DomainError> {
    Ok(rsvps_sea::count_for_event(conn, event_id).await?)
}

pub async fn count_distinct_participants<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<i64, DomainError> {
    Ok(rsvps_sea::count_distinct_participants(conn).await?)
}

pub async fn participants<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<User>, DomainError> {
    let rows = rsvps_sea::participants(conn).await?;
    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn list_for_user_with_events<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<(Rsvp, Event)>, DomainError> {
    let rows = rsvps_sea::list_for_user_with_events(conn, user_id).await?;
    Ok(rows
        .into_iter()
        .map(|(rsvp, event)| (Rsvp::from(rsvp), Event::from(event)))
        .collect())
}

pub async fn counts_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<HashMap<i64, i64>, DomainError> {
    Ok(rsvps_sea::counts_by_user(conn).await?)
}

impl From<crate::entities::rsvps::Model> for Rsvp {
    fn from(model: crate::entities::rsvps::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            event_id: model.event_id,
            notes: model.notes,
            rsvp_date: model.rsvp_date,
            updated_at: model.updated_at,
        }
    }
}

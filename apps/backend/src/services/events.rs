//! Event catalogue: browsing, detail and organizer maintenance.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::domain::{schedule, validation};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::repos::categories::{self, Category};
use crate::repos::events::{self, Event, EventFilter, EventWrite};
use crate::repos::rsvps::{self, Rsvp};

/// Raw create/update payload; dates and times arrive as strings.
#[derive(Debug, Clone)]
pub struct EventInput {
    pub name: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub category_id: i64,
}

/// Raw list filters as they appear in the query string.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventSummary {
    pub event: Event,
    pub category: Option<Category>,
    pub rsvp_count: i64,
    pub registration_count: i64,
}

#[derive(Debug, Clone)]
pub struct EventListing {
    pub events: Vec<EventSummary>,
    pub total_participants: i64,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone)]
pub struct EventDetail {
    pub event: Event,
    pub category: Option<Category>,
    pub total_rsvps: u64,
    pub has_passed: bool,
    pub can_rsvp: bool,
    /// The viewer's own RSVP, when authenticated
    pub user_rsvp: Option<Rsvp>,
}

pub(crate) fn event_not_found(id: i64) -> AppError {
    DomainError::not_found(NotFoundKind::Event, format!("Event {id} not found")).into()
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_category(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::bad_request(
            ErrorCode::InvalidId,
            format!("Invalid category id: {raw}"),
        )),
    }
}

impl ListFilters {
    /// Empty values are ignored; anything else must parse.
    pub fn parse(&self) -> Result<EventFilter, AppError> {
        Ok(EventFilter {
            category_id: present(&self.category).map(parse_category).transpose()?,
            start_date: present(&self.start_date)
                .map(schedule::parse_date)
                .transpose()?,
            end_date: present(&self.end_date)
                .map(schedule::parse_date)
                .transpose()?,
            search: None,
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EventService;

impl EventService {
    pub fn new() -> Self {
        Self
    }

    /// Public landing list, optionally narrowed by a name/location search.
    pub async fn home<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        search: Option<&str>,
    ) -> Result<Vec<EventSummary>, AppError> {
        let filter = EventFilter {
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            ..EventFilter::default()
        };
        let found = events::list(conn, &filter).await?;
        summarize(conn, found).await
    }

    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filters: &ListFilters,
    ) -> Result<EventListing, AppError> {
        let filter = filters.parse()?;
        let found = events::list(conn, &filter).await?;
        Ok(EventListing {
            events: summarize(conn, found).await?,
            total_participants: rsvps::count_distinct_participants(conn).await?,
            categories: categories::list(conn).await?,
        })
    }

    pub async fn detail<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        viewer: Option<i64>,
        now: OffsetDateTime,
    ) -> Result<EventDetail, AppError> {
        let event = self.get(conn, id).await?;
        let category = categories::find(conn, event.category_id).await?;
        let total_rsvps = rsvps::count_for_event(conn, id).await?;
        let user_rsvp = match viewer {
            Some(user_id) => rsvps::find_for_user_event(conn, user_id, id).await?,
            None => None,
        };
        let has_passed = event.has_passed(now);
        Ok(EventDetail {
            event,
            category,
            total_rsvps,
            has_passed,
            can_rsvp: !has_passed,
            user_rsvp,
        })
    }

    pub async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Event, AppError> {
        events::find(conn, id).await?.ok_or_else(|| event_not_found(id))
    }

    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        input: EventInput,
        created_by: i64,
    ) -> Result<Event, AppError> {
        let dto = validate(conn, input).await?;
        let event = events::create(conn, dto, Some(created_by)).await?;
        info!(event_id = event.id, created_by, "event created");
        Ok(event)
    }

    /// Full replacement of the editable fields.
    pub async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        input: EventInput,
    ) -> Result<Event, AppError> {
        self.get(conn, id).await?;
        let dto = validate(conn, input).await?;
        Ok(events::update(conn, id, dto).await?)
    }

    pub async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<(), AppError> {
        if !events::delete(conn, id).await? {
            return Err(event_not_found(id));
        }
        info!(event_id = id, "event deleted");
        Ok(())
    }
}

async fn validate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: EventInput,
) -> Result<EventWrite, AppError> {
    let name = validation::required_text("Name", &input.name, Some(validation::EVENT_NAME_MAX))?;
    let description = validation::optional_text("Description", &input.description, None)?;
    let location =
        validation::required_text("Location", &input.location, Some(validation::LOCATION_MAX))?;
    let date: Date = schedule::parse_date(&input.date)?;
    let time = schedule::parse_time(&input.time)?;

    if categories::find(conn, input.category_id).await?.is_none() {
        return Err(DomainError::validation(
            ValidationKind::InvalidCategory,
            format!("Category {} does not exist", input.category_id),
        )
        .into());
    }

    Ok(EventWrite {
        name,
        description,
        date,
        time,
        location,
        category_id: input.category_id,
    })
}

/// Attach categories and counts with one query per relation.
pub(crate) async fn summarize<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    found: Vec<Event>,
) -> Result<Vec<EventSummary>, AppError> {
    let ids: Vec<i64> = found.iter().map(|e| e.id).collect();
    let mut category_ids: Vec<i64> = found.iter().map(|e| e.category_id).collect();
    category_ids.sort_unstable();
    category_ids.dedup();

    let cats: HashMap<i64, Category> = categories::find_many(conn, category_ids).await?;
    let rsvp_counts = events::rsvp_counts(conn, ids.clone()).await?;
    let registration_counts = events::registration_counts(conn, ids).await?;

    Ok(found
        .into_iter()
        .map(|event| EventSummary {
            category: cats.get(&event.category_id).cloned(),
            rsvp_count: rsvp_counts.get(&event.id).copied().unwrap_or(0),
            registration_count: registration_counts.get(&event.id).copied().unwrap_or(0),
            event,
        })
        .collect())
}

//! JSON shapes shared by several route modules.
//!
//! Dates render as `YYYY-MM-DD`, times as `HH:MM`, timestamps as RFC 3339.

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{primary_role_label, schedule, Role};
use crate::repos::categories::Category;
use crate::repos::events::Event;
use crate::repos::rsvps::Rsvp;
use crate::repos::users::User;
use crate::services::events::EventSummary;

pub fn rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub email_verified: bool,
    pub last_login: Option<String>,
    pub date_joined: String,
    pub role: &'static str,
    pub roles: Vec<&'static str>,
}

impl UserView {
    pub fn new(user: User, roles: &[Role]) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            bio: user.bio,
            address: user.address,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            email_verified: user.email_verified,
            last_login: user.last_login.map(rfc3339),
            date_joined: rfc3339(user.created_at),
            role: primary_role_label(roles),
            roles: roles.iter().map(|r| r.as_str()).collect(),
        }
    }
}

/// Compact user entry for participant lists.
#[derive(Debug, Serialize)]
pub struct ParticipantView {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
}

impl From<User> for ParticipantView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name(),
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_count: Option<i64>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            event_count: None,
        }
    }
}

impl CategoryView {
    pub fn with_count(category: Category, event_count: i64) -> Self {
        Self {
            event_count: Some(event_count),
            ..Self::from(category)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryView>,
    pub created_by: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_count: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            date: schedule::format_date(event.date),
            time: schedule::format_time(event.time),
            location: event.location,
            category_id: event.category_id,
            category: None,
            created_by: event.created_by,
            rsvp_count: None,
            registration_count: None,
            created_at: rfc3339(event.created_at),
            updated_at: rfc3339(event.updated_at),
        }
    }
}

impl From<EventSummary> for EventView {
    fn from(summary: EventSummary) -> Self {
        Self {
            category: summary.category.map(CategoryView::from),
            rsvp_count: Some(summary.rsvp_count),
            registration_count: Some(summary.registration_count),
            ..Self::from(summary.event)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RsvpView {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub notes: Option<String>,
    pub rsvp_date: String,
    pub updated_at: String,
}

impl From<Rsvp> for RsvpView {
    fn from(rsvp: Rsvp) -> Self {
        Self {
            id: rsvp.id,
            user_id: rsvp.user_id,
            event_id: rsvp.event_id,
            notes: rsvp.notes,
            rsvp_date: rfc3339(rsvp.rsvp_date),
            updated_at: rfc3339(rsvp.updated_at),
        }
    }
}

/// An RSVP with its event, as listed on the participant dashboard.
#[derive(Debug, Serialize)]
pub struct RsvpWithEventView {
    #[serde(flatten)]
    pub rsvp: RsvpView,
    pub event: EventView,
}

impl From<(Rsvp, Event)> for RsvpWithEventView {
    fn from((rsvp, event): (Rsvp, Event)) -> Self {
        Self {
            rsvp: rsvp.into(),
            event: event.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::info;

use super::events::event_not_found;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::events::{self, Event};
use crate::repos::rsvps::{self, Rsvp};

/// Result of an RSVP call; `created` tells a new RSVP from a notes update.
#[derive(Debug, Clone)]
pub struct RsvpOutcome {
    pub rsvp: Rsvp,
    pub event: Event,
    pub created: bool,
}

fn already_passed(event: &Event) -> AppError {
    DomainError::validation(
        ValidationKind::EventAlreadyPassed,
        format!("Event '{}' has already taken place", event.name),
    )
    .into()
}

async fn open_event<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    event_id: i64,
    now: OffsetDateTime,
) -> Result<Event, AppError> {
    let event = events::find(conn, event_id)
        .await?
        .ok_or_else(|| event_not_found(event_id))?;
    if event.has_passed(now) {
        return Err(already_passed(&event));
    }
    Ok(event)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RsvpService;

impl RsvpService {
    pub fn new() -> Self {
        Self
    }

    /// Create the caller's RSVP or replace the notes on the existing one.
    pub async fn rsvp<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        event_id: i64,
        notes: Option<String>,
        now: OffsetDateTime,
    ) -> Result<RsvpOutcome, AppError> {
        let event = open_event(conn, event_id, now).await?;
        let notes = notes
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());

        let (rsvp, created) = match rsvps::find_for_user_event(conn, user_id, event_id).await? {
            Some(existing) => (rsvps::update_notes(conn, existing.id, notes).await?, false),
            None => (rsvps::create(conn, user_id, event_id, notes).await?, true),
        };

        info!(user_id, event_id, created, "rsvp recorded");
        Ok(RsvpOutcome {
            rsvp,
            event,
            created,
        })
    }

    /// Remove the caller's RSVP; returns the event for the notification.
    pub async fn cancel<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        event_id: i64,
        now: OffsetDateTime,
    ) -> Result<Event, AppError> {
        let event = open_event(conn, event_id, now).await?;
        let existing = rsvps::find_for_user_event(conn, user_id, event_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Rsvp,
                    format!("No RSVP for event {event_id}"),
                )
            })?;
        rsvps::delete(conn, existing.id).await?;
        info!(user_id, event_id, "rsvp cancelled");
        Ok(event)
    }
}

//! Dashboard endpoints under `/api/dashboard`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::views::{EventView, ParticipantView, RsvpWithEventView, UserView};
use crate::db::txn::with_txn;
use crate::domain::{primary_role_label, schedule};
use crate::error::AppError;
use crate::extractors::{AdminOnly, AdminOrOrganizer, Authorized, CurrentUser};
use crate::services::dashboards::{AdminDashboard, DashboardService, StatsDetail, StatsType};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct OrganizerQuery {
    #[serde(default)]
    pub stats: Option<String>,
}

#[derive(Debug, Serialize)]
struct OrganizerResponse {
    total_events: u64,
    upcoming_events: u64,
    past_events: u64,
    total_participants: i64,
    todays_events: Vec<EventView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<EventView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    participants: Option<Vec<ParticipantView>>,
}

#[derive(Debug, Serialize)]
struct ParticipantResponse {
    upcoming_rsvps: Vec<RsvpWithEventView>,
    past_rsvps: Vec<RsvpWithEventView>,
    total_rsvps: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminUserEntry {
    #[serde(flatten)]
    user: UserView,
    rsvp_count: i64,
    primary_role: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminResponse {
    users: Vec<AdminUserEntry>,
    total_users: usize,
    admin_count: usize,
    organizer_count: usize,
    participant_count: usize,
}

impl From<AdminDashboard> for AdminResponse {
    fn from(dashboard: AdminDashboard) -> Self {
        let users: Vec<AdminUserEntry> = dashboard
            .users
            .into_iter()
            .map(|row| AdminUserEntry {
                primary_role: primary_role_label(&row.roles),
                rsvp_count: row.rsvp_count,
                user: UserView::new(row.user, &row.roles),
            })
            .collect();
        Self {
            total_users: users.len(),
            users,
            admin_count: dashboard.admin_count,
            organizer_count: dashboard.organizer_count,
            participant_count: dashboard.participant_count,
        }
    }
}

async fn organizer_dashboard(
    req: HttpRequest,
    _caller: Authorized<AdminOrOrganizer>,
    query: web::Query<OrganizerQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let stats = query.stats.as_deref().and_then(StatsType::parse);
    let today = schedule::today_utc();

    let dashboard = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { DashboardService::new().organizer(txn, stats, today).await })
    })
    .await?;

    let (stats_type, events, participants) = match dashboard.stats {
        None => (None, None, None),
        Some((kind, StatsDetail::Events(list))) => (
            Some(kind.as_str()),
            Some(list.into_iter().map(EventView::from).collect()),
            None,
        ),
        Some((kind, StatsDetail::Participants(users))) => (
            Some(kind.as_str()),
            None,
            Some(users.into_iter().map(ParticipantView::from).collect()),
        ),
    };

    Ok(HttpResponse::Ok().json(OrganizerResponse {
        total_events: dashboard.total_events,
        upcoming_events: dashboard.upcoming_events,
        past_events: dashboard.past_events,
        total_participants: dashboard.total_participants,
        todays_events: dashboard
            .todays_events
            .into_iter()
            .map(EventView::from)
            .collect(),
        stats_type,
        events,
        participants,
    }))
}

async fn participant_dashboard(
    req: HttpRequest,
    caller: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = caller.id();
    let today = schedule::today_utc();

    let dashboard = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { DashboardService::new().participant(txn, user_id, today).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ParticipantResponse {
        upcoming_rsvps: dashboard
            .upcoming_rsvps
            .into_iter()
            .map(RsvpWithEventView::from)
            .collect(),
        past_rsvps: dashboard
            .past_rsvps
            .into_iter()
            .map(RsvpWithEventView::from)
            .collect(),
        total_rsvps: dashboard.total_rsvps,
    }))
}

pub(crate) async fn admin_dashboard(
    req: HttpRequest,
    _caller: Authorized<AdminOnly>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let dashboard = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { DashboardService::new().admin(txn).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(AdminResponse::from(dashboard)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/organizer", web::get().to(organizer_dashboard))
        .route("/participant", web::get().to(participant_dashboard))
        .route("/admin", web::get().to(admin_dashboard));
}

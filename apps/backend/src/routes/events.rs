//! Event browsing, maintenance and RSVP endpoints under `/api`.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::views::{CategoryView, EventView, RsvpView};
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{
    AdminOrOrganizer, Authorized, CurrentUser, OptionalJson, OptionalUser, PathId, ValidatedJson,
};
use crate::services::events::{EventInput, EventService, ListFilters};
use crate::services::rsvps::RsvpService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub category_id: i64,
}

impl From<EventRequest> for EventInput {
    fn from(r: EventRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            date: r.date,
            time: r.time,
            location: r.location,
            category_id: r.category_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RsvpRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct HomeResponse {
    events: Vec<EventView>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    events: Vec<EventView>,
    total_participants: i64,
    categories: Vec<CategoryView>,
    filters: ListQuery,
}

#[derive(Debug, Serialize)]
struct RsvpStats {
    total_rsvps: u64,
}

#[derive(Debug, Serialize)]
struct DetailResponse {
    event: EventView,
    rsvp_stats: RsvpStats,
    has_passed: bool,
    can_rsvp: bool,
    user_rsvp: Option<RsvpView>,
}

#[derive(Debug, Serialize)]
struct RsvpResponse {
    created: bool,
    message: String,
    rsvp: RsvpView,
}

async fn home(
    req: HttpRequest,
    query: web::Query<HomeQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let search = query.into_inner().search;
    let term = search.clone();

    let found = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { EventService::new().home(txn, term.as_deref()).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(HomeResponse {
        events: found.into_iter().map(EventView::from).collect(),
        search,
    }))
}

async fn list_events(
    req: HttpRequest,
    query: web::Query<ListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let echoed = query.into_inner();
    let filters = ListFilters {
        category: echoed.category.clone(),
        start_date: echoed.start_date.clone(),
        end_date: echoed.end_date.clone(),
    };

    let listing = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { EventService::new().list(txn, &filters).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ListResponse {
        events: listing.events.into_iter().map(EventView::from).collect(),
        total_participants: listing.total_participants,
        categories: listing.categories.into_iter().map(CategoryView::from).collect(),
        filters: echoed,
    }))
}

async fn event_detail(
    req: HttpRequest,
    id: PathId,
    viewer: OptionalUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let viewer_id = viewer.id();
    let now = OffsetDateTime::now_utc();

    let detail = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { EventService::new().detail(txn, id.0, viewer_id, now).await })
    })
    .await?;

    let mut event = EventView::from(detail.event);
    event.category = detail.category.map(CategoryView::from);
    Ok(HttpResponse::Ok().json(DetailResponse {
        event,
        rsvp_stats: RsvpStats {
            total_rsvps: detail.total_rsvps,
        },
        has_passed: detail.has_passed,
        can_rsvp: detail.can_rsvp,
        user_rsvp: detail.user_rsvp.map(RsvpView::from),
    }))
}

async fn create_event(
    req: HttpRequest,
    caller: Authorized<AdminOrOrganizer>,
    app_state: web::Data<AppState>,
    body: ValidatedJson<EventRequest>,
) -> Result<HttpResponse, AppError> {
    let input = EventInput::from(body.into_inner());
    let created_by = caller.id();

    let event = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { EventService::new().create(txn, input, created_by).await })
    })
    .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/events/{}", event.id)))
        .json(EventView::from(event)))
}

async fn update_event(
    req: HttpRequest,
    id: PathId,
    _caller: Authorized<AdminOrOrganizer>,
    app_state: web::Data<AppState>,
    body: ValidatedJson<EventRequest>,
) -> Result<HttpResponse, AppError> {
    let input = EventInput::from(body.into_inner());

    let event = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { EventService::new().update(txn, id.0, input).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(EventView::from(event)))
}

async fn delete_event(
    req: HttpRequest,
    id: PathId,
    _caller: Authorized<AdminOrOrganizer>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { EventService::new().delete(txn, id.0).await })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Body is optional; an empty request records an RSVP without notes.
async fn rsvp_event(
    req: HttpRequest,
    id: PathId,
    caller: CurrentUser,
    app_state: web::Data<AppState>,
    body: OptionalJson<RsvpRequest>,
) -> Result<HttpResponse, AppError> {
    let notes = body.into_inner().notes;
    let user_id = caller.id();
    let now = OffsetDateTime::now_utc();

    let outcome = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move {
            RsvpService::new()
                .rsvp(txn, user_id, id.0, notes, now)
                .await
        })
    })
    .await?;

    let notifier = app_state.notifier();
    let (status, message) = if outcome.created {
        notifier.rsvp_confirmed(&caller.user, &outcome.event).await;
        (
            actix_web::http::StatusCode::CREATED,
            format!("You have successfully RSVP'd to {}", outcome.event.name),
        )
    } else {
        notifier.rsvp_updated(&caller.user, &outcome.event).await;
        (
            actix_web::http::StatusCode::OK,
            format!("Your RSVP for {} has been updated", outcome.event.name),
        )
    };

    Ok(HttpResponse::build(status).json(RsvpResponse {
        created: outcome.created,
        message,
        rsvp: RsvpView::from(outcome.rsvp),
    }))
}

async fn cancel_rsvp(
    req: HttpRequest,
    id: PathId,
    caller: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = caller.id();
    let now = OffsetDateTime::now_utc();

    let event = with_txn(Some(&req), &app_state, move |txn| {
        Box::pin(async move { RsvpService::new().cancel(txn, user_id, id.0, now).await })
    })
    .await?;

    app_state
        .notifier()
        .rsvp_cancelled(&caller.user, &event)
        .await;
    Ok(HttpResponse::NoContent().finish())
}

/// Registration was folded into RSVP; point clients at the new resource.
async fn legacy_register(id: PathId, _caller: CurrentUser) -> HttpResponse {
    HttpResponse::PermanentRedirect()
        .insert_header((header::LOCATION, format!("/api/events/{}/rsvp", id.0)))
        .finish()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/home", web::get().to(home))
        .service(
            web::resource("/events")
                .route(web::get().to(list_events))
                .route(web::post().to(create_event)),
        )
        .service(
            web::resource("/events/{id}")
                .route(web::get().to(event_detail))
                .route(web::put().to(update_event))
                .route(web::delete().to(delete_event)),
        )
        .service(
            web::resource("/events/{id}/rsvp")
                .route(web::post().to(rsvp_event))
                .route(web::delete().to(cancel_rsvp)),
        )
        .service(
            web::resource("/events/{id}/register")
                .route(web::post().to(legacy_register))
                .route(web::delete().to(legacy_register)),
        );
}

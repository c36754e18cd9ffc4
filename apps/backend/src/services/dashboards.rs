//! Aggregated views for organizers, participants and administrators.

use sea_orm::ConnectionTrait;
use time::Date;

use super::events::{summarize, EventSummary};
use crate::domain::{primary_role, Role};
use crate::error::AppError;
use crate::repos::events::{self, DateWindow, Event};
use crate::repos::rsvps::{self, Rsvp};
use crate::repos::users::{self, User};
use crate::repos::roles;

/// Detail list selectable on the organizer dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsType {
    Total,
    Upcoming,
    Past,
    Participants,
}

impl StatsType {
    /// Unknown values select nothing.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "total" => Some(Self::Total),
            "upcoming" => Some(Self::Upcoming),
            "past" => Some(Self::Past),
            "participants" => Some(Self::Participants),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Upcoming => "upcoming",
            Self::Past => "past",
            Self::Participants => "participants",
        }
    }
}

#[derive(Debug, Clone)]
pub enum StatsDetail {
    Events(Vec<EventSummary>),
    Participants(Vec<User>),
}

#[derive(Debug, Clone)]
pub struct OrganizerDashboard {
    pub total_events: u64,
    pub upcoming_events: u64,
    pub past_events: u64,
    pub total_participants: i64,
    pub todays_events: Vec<EventSummary>,
    pub stats: Option<(StatsType, StatsDetail)>,
}

#[derive(Debug, Clone)]
pub struct ParticipantDashboard {
    pub upcoming_rsvps: Vec<(Rsvp, Event)>,
    pub past_rsvps: Vec<(Rsvp, Event)>,
    pub total_rsvps: usize,
}

#[derive(Debug, Clone)]
pub struct AdminUserRow {
    pub user: User,
    pub roles: Vec<Role>,
    pub primary_role: Option<Role>,
    pub rsvp_count: i64,
}

#[derive(Debug, Clone)]
pub struct AdminDashboard {
    pub users: Vec<AdminUserRow>,
    pub admin_count: usize,
    pub organizer_count: usize,
    pub participant_count: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    pub async fn organizer<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        stats: Option<StatsType>,
        today: Date,
    ) -> Result<OrganizerDashboard, AppError> {
        let todays = events::list_in_window(conn, DateWindow::On(today)).await?;

        let stats = match stats {
            None => None,
            Some(StatsType::Participants) => Some((
                StatsType::Participants,
                StatsDetail::Participants(rsvps::participants(conn).await?),
            )),
            Some(kind) => {
                let window = match kind {
                    StatsType::Upcoming => DateWindow::Upcoming(today),
                    StatsType::Past => DateWindow::Past(today),
                    _ => DateWindow::All,
                };
                let listed = events::list_in_window(conn, window).await?;
                Some((kind, StatsDetail::Events(summarize(conn, listed).await?)))
            }
        };

        Ok(OrganizerDashboard {
            total_events: events::count_in_window(conn, DateWindow::All).await?,
            upcoming_events: events::count_in_window(conn, DateWindow::Upcoming(today)).await?,
            past_events: events::count_in_window(conn, DateWindow::Past(today)).await?,
            total_participants: rsvps::count_distinct_participants(conn).await?,
            todays_events: summarize(conn, todays).await?,
            stats,
        })
    }

    /// The caller's RSVPs in event order; today's events count as upcoming.
    pub async fn participant<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        today: Date,
    ) -> Result<ParticipantDashboard, AppError> {
        let all = rsvps::list_for_user_with_events(conn, user_id).await?;
        let total_rsvps = all.len();
        let (upcoming_rsvps, past_rsvps): (Vec<_>, Vec<_>) = all
            .into_iter()
            .partition(|(_, event)| event.date >= today);
        Ok(ParticipantDashboard {
            upcoming_rsvps,
            past_rsvps,
            total_rsvps,
        })
    }

    pub async fn admin<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<AdminDashboard, AppError> {
        let mut memberships = roles::memberships(conn).await?;
        let rsvp_counts = rsvps::counts_by_user(conn).await?;

        let rows: Vec<AdminUserRow> = users::list_users(conn)
            .await?
            .into_iter()
            .map(|user| {
                let roles = memberships.remove(&user.id).unwrap_or_default();
                AdminUserRow {
                    primary_role: primary_role(&roles),
                    rsvp_count: rsvp_counts.get(&user.id).copied().unwrap_or(0),
                    roles,
                    user,
                }
            })
            .collect();

        let count = |role: Role| rows.iter().filter(|r| r.primary_role == Some(role)).count();
        Ok(AdminDashboard {
            admin_count: count(Role::Admin),
            organizer_count: count(Role::Organizer),
            participant_count: count(Role::Participant),
            users: rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::StatsType;

    #[test]
    fn stats_type_parses_known_values_only() {
        for kind in [
            StatsType::Total,
            StatsType::Upcoming,
            StatsType::Past,
            StatsType::Participants,
        ] {
            assert_eq!(StatsType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(StatsType::parse("everything"), None);
        assert_eq!(StatsType::parse(""), None);
    }
}

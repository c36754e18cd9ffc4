//! DTOs for events_sea adapter.

use time::{Date, Time};

/// Column values shared by create and full update.
#[derive(Debug, Clone)]
pub struct EventWrite {
    pub name: String,
    pub description: String,
    pub date: Date,
    pub time: Time,
    pub location: String,
    pub category_id: i64,
}

/// Optional list filters; all present filters must hold.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub category_id: Option<i64>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Case-insensitive substring of name or location
    pub search: Option<String>,
}

/// Which slice of the calendar a dashboard asks for, relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    All,
    /// date > today
    Upcoming(Date),
    /// date < today
    Past(Date),
    /// date == today
    On(Date),
}

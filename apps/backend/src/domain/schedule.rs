//! Event dates and times. Wall-clock values are interpreted as UTC.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::errors::domain::{DomainError, ValidationKind};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_HM: &[FormatItem<'static>] = format_description!("[hour]:[minute]");
const TIME_HMS: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

pub fn parse_date(raw: &str) -> Result<Date, DomainError> {
    Date::parse(raw.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::validation(
            ValidationKind::InvalidDate,
            format!("Invalid date '{raw}', expected YYYY-MM-DD"),
        )
    })
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Result<Time, DomainError> {
    let value = raw.trim();
    Time::parse(value, TIME_HM)
        .or_else(|_| Time::parse(value, TIME_HMS))
        .map_err(|_| {
            DomainError::validation(
                ValidationKind::InvalidTime,
                format!("Invalid time '{raw}', expected HH:MM"),
            )
        })
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

pub fn format_time(time: Time) -> String {
    time.format(TIME_HM).unwrap_or_default()
}

pub fn starts_at(date: Date, time: Time) -> OffsetDateTime {
    PrimitiveDateTime::new(date, time).assume_utc()
}

/// True once `now` is strictly after the event's start.
pub fn has_passed(date: Date, time: Time, now: OffsetDateTime) -> bool {
    now > starts_at(date, time)
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

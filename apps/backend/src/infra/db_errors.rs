//! SeaORM -> DomainError translation.
//!
//! Adapters return raw `sea_orm::DbErr`; repos convert here so that higher
//! layers only ever see `DomainError`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

const SQLITE_UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

/// Unique indexes we know how to explain: (Postgres index name, SQLite column list).
const UNIQUE_TARGETS: &[(&str, &str)] = &[
    ("ux_users_username", "users.username"),
    ("ux_users_email", "users.email"),
    ("ux_categories_name", "categories.name"),
    ("ux_rsvps_user_event", "rsvps.user_id, rsvps.event_id"),
    ("ux_user_roles_user_role", "user_roles.user_id, user_roles.role_id"),
    (
        "ux_event_registrations_user_event",
        "event_registrations.user_id, event_registrations.event_id",
    ),
];

fn conflict_for_index(index: &str) -> DomainError {
    match index {
        "ux_users_username" => DomainError::conflict(
            ConflictKind::UsernameTaken,
            "A user with that username already exists",
        ),
        "ux_users_email" => DomainError::conflict(
            ConflictKind::EmailTaken,
            "This email address is already registered",
        ),
        "ux_categories_name" => DomainError::conflict(
            ConflictKind::CategoryNameTaken,
            "A category with that name already exists",
        ),
        "ux_rsvps_user_event" => DomainError::conflict(
            ConflictKind::RsvpExists,
            "You have already RSVP'd to this event",
        ),
        "ux_user_roles_user_role" => DomainError::conflict(
            ConflictKind::Other("RoleMembership".into()),
            "User already belongs to that group",
        ),
        _ => DomainError::conflict(
            ConflictKind::Other("Registration".into()),
            "You are already registered for this event",
        ),
    }
}

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Column list from "UNIQUE constraint failed: t.a, t.b", up to end of line.
fn sqlite_unique_columns(msg: &str) -> Option<&str> {
    let start = msg.find(SQLITE_UNIQUE_PREFIX)? + SQLITE_UNIQUE_PREFIX.len();
    let rest = &msg[start..];
    let end = rest.find(['\n', '"', ')']).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn known_unique_violation(msg: &str) -> Option<DomainError> {
    let index = match sqlite_unique_columns(msg) {
        Some(columns) => UNIQUE_TARGETS
            .iter()
            .find(|(_, cols)| *cols == columns)
            .map(|(index, _)| *index),
        None => UNIQUE_TARGETS
            .iter()
            .find(|(index, _)| msg.contains(index))
            .map(|(index, _)| *index),
    }?;
    Some(conflict_for_index(index))
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains(SQLITE_UNIQUE_PREFIX)
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");
        return known_unique_violation(&error_msg).unwrap_or_else(|| {
            DomainError::conflict(
                ConflictKind::Other("Unique".into()),
                "Unique constraint violation",
            )
        });
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation_other("Referenced record does not exist");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, RuntimeErr};

    use super::*;

    fn exec_err(msg: &str) -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(msg.to_owned()))
    }

    #[test]
    fn sqlite_single_column_unique() {
        let err = map_db_err(exec_err(
            "error returned from database: (code: 2067) UNIQUE constraint failed: users.email",
        ));
        assert!(matches!(err, DomainError::Conflict(ConflictKind::EmailTaken, _)));
    }

    #[test]
    fn sqlite_composite_unique() {
        let err = map_db_err(exec_err(
            "UNIQUE constraint failed: rsvps.user_id, rsvps.event_id",
        ));
        assert!(matches!(err, DomainError::Conflict(ConflictKind::RsvpExists, _)));
    }

    #[test]
    fn postgres_index_name() {
        let err = map_db_err(exec_err(
            "duplicate key value violates unique constraint \"ux_categories_name\"",
        ));
        assert!(matches!(
            err,
            DomainError::Conflict(ConflictKind::CategoryNameTaken, _)
        ));

        let err = map_db_err(exec_err(
            "duplicate key value violates unique constraint \"ux_users_username\"",
        ));
        assert!(matches!(err, DomainError::Conflict(ConflictKind::UsernameTaken, _)));
    }

    #[test]
    fn unknown_unique_falls_back() {
        let err = map_db_err(exec_err("UNIQUE constraint failed: other.thing"));
        assert!(matches!(err, DomainError::Conflict(ConflictKind::Other(_), _)));
    }

    #[test]
    fn record_not_found_and_fk() {
        let err = map_db_err(DbErr::RecordNotFound("events".into()));
        assert!(matches!(err, DomainError::NotFound(_, _)));

        let err = map_db_err(exec_err("FOREIGN KEY constraint failed"));
        assert!(matches!(err, DomainError::Validation(_, _)));
    }

    #[test]
    fn unknown_error_is_infra() {
        let err = map_db_err(DbErr::Custom("boom".into()));
        assert!(matches!(err, DomainError::Infra(InfraErrorKind::Other(_), _)));
    }
}

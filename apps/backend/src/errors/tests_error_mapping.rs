// DomainError -> AppError mapping, no HTTP server or database involved
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400_with_specific_code() {
    let app: AppError =
        DomainError::validation(ValidationKind::EventAlreadyPassed, "event over").into();
    assert_eq!(app.code(), ErrorCode::EventAlreadyPassed);
    assert_eq!(app.status().as_u16(), 400);

    let app: AppError = DomainError::validation_other("bad field").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::conflict(ConflictKind::UsernameTaken, "taken").into();
    assert_eq!(app.code().as_str(), "USERNAME_TAKEN");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::conflict(ConflictKind::EmailTaken, "taken").into();
    assert_eq!(app.code().as_str(), "EMAIL_TAKEN");

    let app: AppError =
        DomainError::conflict(ConflictKind::Other("Unique".into()), "dup").into();
    assert_eq!(app.code(), ErrorCode::UniqueViolation);

    let app: AppError =
        DomainError::conflict(ConflictKind::Other("whatever".into()), "generic").into();
    assert_eq!(app.code(), ErrorCode::Conflict);
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let cases = [
        (NotFoundKind::User, "USER_NOT_FOUND"),
        (NotFoundKind::Event, "EVENT_NOT_FOUND"),
        (NotFoundKind::Category, "CATEGORY_NOT_FOUND"),
        (NotFoundKind::Rsvp, "RSVP_NOT_FOUND"),
        (NotFoundKind::Other("Record".into()), "RECORD_NOT_FOUND"),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::not_found(kind, "missing").into();
        assert_eq!(app.code().as_str(), code);
        assert_eq!(app.status().as_u16(), 404);
    }
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "slow").into();
    assert_eq!(app.code(), ErrorCode::DbTimeout);
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code(), ErrorCode::DbUnavailable);
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "bad").into();
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError =
        DomainError::infra(InfraErrorKind::Other("DbErr".into()), "failed").into();
    assert_eq!(app.code(), ErrorCode::DbError);
    assert_eq!(app.status().as_u16(), 500);
}

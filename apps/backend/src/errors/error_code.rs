//! Error codes for the EMS API.
//!
//! Every machine-readable code that can leave the service is listed here.
//! Add new codes here; never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes. Each variant maps to the SCREAMING_SNAKE_CASE
/// string that appears in the `code` field of Problem Details responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Wrong username or password
    InvalidCredentials,
    /// Account switched off by an administrator
    AccountDisabled,
    /// Email address not confirmed yet
    AccountNotActivated,
    /// Access denied
    Forbidden,
    /// Token subject no longer exists
    ForbiddenUserNotFound,
    /// Caller lacks the required group membership
    InsufficientRole,

    // Request Validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Malformed username
    InvalidUsername,
    /// Malformed email address
    InvalidEmail,
    /// Password and confirmation differ
    PasswordMismatch,
    /// Password too short or entirely numeric
    WeakPassword,
    /// Phone number does not match the accepted format
    InvalidPhoneNumber,
    /// Activation link malformed, stale or already rotated
    InvalidActivationToken,
    /// Date is not YYYY-MM-DD
    InvalidDate,
    /// Time is not HH:MM or HH:MM:SS
    InvalidTime,
    /// Category id does not resolve
    InvalidCategory,
    /// Role name is not one of the known groups
    InvalidRole,
    /// Path or query id is not a positive integer
    InvalidId,
    /// Event already happened
    EventAlreadyPassed,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// Event not found
    EventNotFound,
    /// Category not found
    CategoryNotFound,
    /// Caller holds no RSVP for the event
    RsvpNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Username already in use
    UsernameTaken,
    /// Email already in use
    EmailTaken,
    /// Category name already in use
    CategoryNameTaken,
    /// Second RSVP for the same user/event pair
    RsvpExists,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout (gateway timeout)
    DbTimeout,

    // Database Constraint Violations
    /// Unique constraint violation without a known mapping
    UniqueViolation,
    /// Record not found (generic 404 for DB-driven not-found)
    RecordNotFound,

    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::AccountNotActivated => "ACCOUNT_NOT_ACTIVATED",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidPhoneNumber => "INVALID_PHONE_NUMBER",
            Self::InvalidActivationToken => "INVALID_ACTIVATION_TOKEN",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidTime => "INVALID_TIME",
            Self::InvalidCategory => "INVALID_CATEGORY",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidId => "INVALID_ID",
            Self::EventAlreadyPassed => "EVENT_ALREADY_PASSED",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::RsvpNotFound => "RSVP_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::CategoryNameTaken => "CATEGORY_NAME_TAKEN",
            Self::RsvpExists => "RSVP_EXISTS",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",

            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Field validators shared by account, category and event input.
//!
//! Each returns the normalized value so callers store exactly what passed.

use lazy_regex::regex_is_match;

use crate::errors::domain::{DomainError, ValidationKind};

pub const USERNAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const NAME_MAX: usize = 150;
pub const PASSWORD_MIN: usize = 8;
pub const BIO_MAX: usize = 500;
pub const CATEGORY_NAME_MAX: usize = 100;
pub const EVENT_NAME_MAX: usize = 200;
pub const LOCATION_MAX: usize = 255;

pub fn username(raw: &str) -> Result<String, DomainError> {
    let value = raw.trim();
    if value.is_empty() || value.chars().count() > USERNAME_MAX {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            format!("Username must be between 1 and {USERNAME_MAX} characters"),
        ));
    }
    if !regex_is_match!(r"^[A-Za-z0-9@.+_-]+$", value) {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            "Username may contain only letters, digits and @/./+/-/_",
        ));
    }
    Ok(value.to_owned())
}

/// Trimmed and lowercased; uniqueness is case-insensitive.
pub fn email(raw: &str) -> Result<String, DomainError> {
    let value = raw.trim().to_lowercase();
    if value.len() > EMAIL_MAX || !regex_is_match!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", &value) {
        return Err(DomainError::validation(
            ValidationKind::InvalidEmail,
            "Enter a valid email address",
        ));
    }
    Ok(value)
}

pub fn password(password: &str, confirm: &str) -> Result<(), DomainError> {
    if password != confirm {
        return Err(DomainError::validation(
            ValidationKind::PasswordMismatch,
            "The two password fields didn't match",
        ));
    }
    if password.chars().count() < PASSWORD_MIN {
        return Err(DomainError::validation(
            ValidationKind::WeakPassword,
            format!("Password must contain at least {PASSWORD_MIN} characters"),
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(
            ValidationKind::WeakPassword,
            "Password can't be entirely numeric",
        ));
    }
    Ok(())
}

/// `+999999999`, up to 15 digits, optional leading `+` and `1`.
pub fn phone_number(raw: &str) -> Result<String, DomainError> {
    let value = raw.trim();
    if !regex_is_match!(r"^\+?1?\d{9,15}$", value) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPhoneNumber,
            "Phone number must be entered in the format: '+999999999'. Up to 15 digits allowed.",
        ));
    }
    Ok(value.to_owned())
}

/// Required, trimmed text bounded by `max` characters.
pub fn required_text(field: &str, raw: &str, max: Option<usize>) -> Result<String, DomainError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DomainError::validation_other(format!("{field} is required")));
    }
    bounded(field, value, max)
}

/// Optional text: trimmed, may be empty, bounded by `max` characters.
pub fn optional_text(field: &str, raw: &str, max: Option<usize>) -> Result<String, DomainError> {
    bounded(field, raw.trim(), max)
}

fn bounded(field: &str, value: &str, max: Option<usize>) -> Result<String, DomainError> {
    match max {
        Some(max) if value.chars().count() > max => Err(DomainError::validation_other(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(value.to_owned()),
    }
}

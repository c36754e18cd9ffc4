//! Collision-free account data for tests sharing one database.
//!
//! Values are ULID based and already in the shape the account validators
//! accept: usernames stay inside `[A-Za-z0-9@.+_-]` and 150 characters, emails
//! are lowercase because the backend stores them that way.

use ulid::Ulid;

const USERNAME_MAX: usize = 150;

/// `{prefix}_{ulid}`, truncated to the username limit.
///
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let a = unique_username("organizer");
/// assert_ne!(a, unique_username("organizer"));
/// assert!(a.starts_with("organizer_"));
/// ```
pub fn unique_username(prefix: &str) -> String {
    let mut name = format!("{prefix}_{}", Ulid::new());
    name.truncate(USERNAME_MAX);
    name
}

/// `{prefix}.{ulid}@ems.test`, lowercase.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}.{}@ems.test", Ulid::new()).to_lowercase()
}

/// Category names are unique too; `{prefix} {ulid}`.
pub fn unique_category(prefix: &str) -> String {
    format!("{prefix} {}", Ulid::new())
}

//! PII-safe formatting for log fields.
//!
//! Emails keep their first character and domain; long opaque runs (bearer
//! tokens, activation tokens, digests) collapse to `[REDACTED_TOKEN]`.

use std::fmt;

use lazy_regex::{lazy_regex, Lazy, Regex};

static EMAIL: Lazy<Regex> = lazy_regex!(r"\b([A-Za-z0-9._%+-]+)(@[A-Za-z0-9.-]+\.[A-Za-z]{1,})\b");

// base64, base64url and hex runs of 16+ characters
static OPAQUE_TOKEN: Lazy<Regex> = lazy_regex!(r"[A-Za-z0-9+/_-]{16,}={0,2}");

/// Mask emails first, then tokens, so a long local part is not eaten twice.
pub fn redact(input: &str) -> String {
    let emails = EMAIL.replace_all(input, |caps: &lazy_regex::Captures| {
        let local = &caps[1];
        let domain = &caps[2];
        match local.chars().next() {
            Some(first) => format!("{first}***{domain}"),
            None => domain.to_owned(),
        }
    });

    OPAQUE_TOKEN
        .replace_all(&emails, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that redacts on formatting, for use in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_local_part() {
        assert_eq!(redact("alice@example.com"), "a***@example.com");
        assert_eq!(
            redact("mail to bob@events.example.org failed"),
            "mail to b***@events.example.org failed"
        );
    }

    #[test]
    fn masks_bearer_and_activation_tokens() {
        assert_eq!(
            redact("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"),
            "[REDACTED_TOKEN]"
        );
        assert_eq!(
            redact("token=Zm9vYmFyYmF6cXV4LV9mb29iYXI"),
            "token=[REDACTED_TOKEN]"
        );
    }

    #[test]
    fn leaves_short_values_alone() {
        assert_eq!(redact("event 42"), "event 42");
        assert_eq!(redact("short123"), "short123");
    }

    #[test]
    fn redacted_wrapper_formats() {
        assert_eq!(format!("{}", Redacted("x@y.io")), "x***@y.io");
    }
}

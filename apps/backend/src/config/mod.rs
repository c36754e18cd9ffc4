//! Environment-driven configuration.
//!
//! Nothing here loads `.env` files; the runtime (docker compose, systemd,
//! a shell with `set -a`) is expected to export the variables.

pub mod db;
pub mod email;
pub mod server;

use std::env;

use crate::error::AppError;

/// Required environment variable, or a config error naming it.
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Optional environment variable; empty strings count as unset.
pub(crate) fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse an optional variable, falling back to `default` when unset.
pub(crate) fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("Environment variable '{name}' has an invalid value"))),
        _ => Ok(default),
    }
}

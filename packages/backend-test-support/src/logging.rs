//! Tracing for test binaries.
//!
//! Quiet by default. `TEST_LOG` takes precedence over `RUST_LOG`, and
//! `TEST_LOG_JSON=1` switches to the same JSON shape the server emits, which
//! helps when checking which fields a request span carries.

use std::env;

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Idempotent; safe to call from every test and from `ctor` hooks.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let builder = fmt()
            .with_env_filter(filter_from_env())
            .with_test_writer()
            .without_time();

        // Another subscriber may already be installed by the harness.
        let _ = if json_requested() {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}

fn filter_from_env() -> EnvFilter {
    env::var("TEST_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn json_requested() -> bool {
    matches!(env::var("TEST_LOG_JSON").as_deref(), Ok("1") | Ok("true"))
}

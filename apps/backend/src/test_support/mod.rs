//! Helpers for integration tests: an in-memory application and its state.

pub mod app_builder;

use std::sync::Arc;

pub use app_builder::create_test_app;

use crate::config::db::{DbKind, DbProfile};
use crate::error::AppError;
use crate::infra::state::build_state;
use crate::notifications::mailer::RecordingMailer;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

pub const TEST_JWT_SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

/// Fresh, migrated in-memory SQLite state whose outgoing mail lands in
/// `mailer`.
pub async fn memory_state(mailer: &RecordingMailer) -> Result<AppState, AppError> {
    build_state()
        .with_db(DbKind::SqliteMemory)
        .with_profile(DbProfile::Test)
        .with_security(SecurityConfig::new(TEST_JWT_SECRET))
        .with_mailer(Arc::new(mailer.clone()))
        .build()
        .await
}

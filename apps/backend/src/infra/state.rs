use std::sync::Arc;

use crate::config::db::{DbKind, DbProfile};
use crate::config::email::EmailConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::notifications::mailer::{mailer_for, Mailer};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for `AppState`, shared by `main` and the test harness.
pub struct StateBuilder {
    security_config: SecurityConfig,
    email_config: EmailConfig,
    mailer: Option<Arc<dyn Mailer>>,
    db_kind: Option<DbKind>,
    profile: DbProfile,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            email_config: EmailConfig::default(),
            mailer: None,
            db_kind: None,
            profile: DbProfile::Prod,
        }
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_profile(mut self, profile: DbProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_email(mut self, email_config: EmailConfig) -> Self {
        self.email_config = email_config;
        self
    }

    /// Override the mailer chosen from `EmailConfig::mode`.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let db = match self.db_kind {
            // single entrypoint: connect + migrate
            Some(kind) => Some(bootstrap_db(kind, self.profile).await?),
            None => None,
        };
        let mailer = self
            .mailer
            .unwrap_or_else(|| mailer_for(&self.email_config));

        Ok(AppState::new(
            db,
            self.security_config,
            self.email_config,
            mailer,
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_without_db() {
        let state = build_state().build().await.unwrap();
        assert!(state.db().is_none());
    }

    #[tokio::test]
    async fn builds_with_memory_db() {
        let state = build_state()
            .with_db(DbKind::SqliteMemory)
            .with_profile(DbProfile::Test)
            .build()
            .await
            .unwrap();
        assert!(state.db().is_some());
    }
}

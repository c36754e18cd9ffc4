use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::email::EmailConfig;
use crate::notifications::mailer::Mailer;
use crate::notifications::notifier::Notifier;

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection (absent in a few unit-test scenarios)
    pub db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub email: EmailConfig,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        db: Option<DatabaseConnection>,
        security: SecurityConfig,
        email: EmailConfig,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            security,
            email,
            mailer,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// Email composer bound to this state's mailer and link settings.
    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.mailer.clone(), self.email.clone())
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("security", &self.security.algorithm)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

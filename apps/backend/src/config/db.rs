use std::env;
use std::str::FromStr;

use super::{must_var, var_or};
use crate::error::AppError;

/// Which database engine to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    /// File-backed SQLite at `SQLITE_PATH`
    SqliteFile,
    /// Private in-memory SQLite, one pooled connection
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbKind::Postgres),
            "sqlite" | "sqlite-file" | "sqlite_file" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!("Unknown DB_KIND '{other}'"))),
        }
    }
}

impl DbKind {
    /// `DB_KIND`, defaulting to Postgres.
    pub fn from_env() -> Result<Self, AppError> {
        var_or("DB_KIND", "postgres").parse()
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, DbKind::SqliteFile | DbKind::SqliteMemory)
    }
}

/// Database profile enum for different environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    Prod,
    /// Test database profile - enforces the `_test` suffix
    Test,
}

/// Database owner enum for different access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access (limited permissions)
    App,
    /// Owner-level access (full permissions for migrations)
    Owner,
}

/// Resolve the connection URL.
///
/// `DATABASE_URL` wins for Postgres when set; otherwise the URL is assembled
/// from the `POSTGRES_*`, `PROD_DB`/`TEST_DB` and credential variables.
pub fn db_url(kind: DbKind, profile: DbProfile, owner: DbOwner) -> Result<String, AppError> {
    match kind {
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
        DbKind::SqliteFile => {
            let path = must_var("SQLITE_PATH")?;
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::Postgres => {
            if let Some(url) = env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()) {
                return Ok(url);
            }
            let host = var_or("POSTGRES_HOST", "localhost");
            let port = var_or("POSTGRES_PORT", "5432");
            let db_name = db_name(profile)?;
            let (username, password) = credentials(owner)?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
    }
}

fn db_name(profile: DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => must_var("PROD_DB"),
        DbProfile::Test => {
            let db_name = must_var("TEST_DB")?;
            if !db_name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), AppError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((must_var("EMS_OWNER_USER")?, must_var("EMS_OWNER_PASSWORD")?)),
    }
}

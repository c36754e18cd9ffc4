use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind, DbOwner, DbProfile};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

fn engine(kind: DbKind) -> &'static str {
    match kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry with a fixed interval; returns the last error once attempts run out.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

fn connect_options(kind: DbKind, url: String) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5));
    match kind {
        // every in-memory connection would be its own empty database
        DbKind::SqliteMemory => {
            opts.max_connections(1).min_connections(1);
        }
        DbKind::SqliteFile => {
            opts.max_connections(4);
        }
        DbKind::Postgres => {
            opts.max_connections(16).min_connections(1);
        }
    }
    opts
}

/// Open a pool. Does NOT run migrations.
pub async fn connect_db(
    kind: DbKind,
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind, profile, owner)?;
    let conn = retry_connection(
        || {
            let opts = connect_options(kind, url.clone());
            async move { Database::connect(opts).await.map_err(AppError::from) }
        },
        CONNECT_ATTEMPTS,
        CONNECT_INTERVAL_MS,
    )
    .await?;

    if kind.is_sqlite() {
        conn.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    }

    info!(engine = engine(kind), profile = ?profile, owner = ?owner, "database connected");
    Ok(conn)
}

/// Single entrypoint used by the server and tests: connect, then bring the
/// schema up to date.
pub async fn bootstrap_db(
    kind: DbKind,
    profile: DbProfile,
) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind, profile, DbOwner::App).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migration failed: {e}")))?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn retry_returns_first_success() {
        let calls = AtomicU32::new(0);
        let out = retry_connection(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(AppError::db_unavailable())
                    } else {
                        Ok(n)
                    }
                }
            },
            5,
            1,
        )
        .await
        .unwrap();
        assert_eq!(out, 3);
    }

    #[tokio::test]
    async fn retry_gives_up_with_last_error() {
        let calls = AtomicU32::new(0);
        let out: Result<(), AppError> = retry_connection(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::db_unavailable()) }
            },
            2,
            1,
        )
        .await;
        assert!(matches!(out, Err(AppError::DbUnavailable)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn bootstrap_sqlite_file_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ems.db");
        std::env::set_var("SQLITE_PATH", &path);

        let conn = bootstrap_db(DbKind::SqliteFile, DbProfile::Test)
            .await
            .unwrap();
        assert_eq!(migration::count_applied_migrations(&conn).await.unwrap(), 1);
        assert!(path.exists());

        std::env::remove_var("SQLITE_PATH");
    }

    #[tokio::test]
    async fn bootstrap_memory_runs_migrations() {
        let conn = bootstrap_db(DbKind::SqliteMemory, DbProfile::Test)
            .await
            .unwrap();
        assert_eq!(migration::count_applied_migrations(&conn).await.unwrap(), 1);
    }
}

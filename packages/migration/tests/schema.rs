use migration::{
    count_applied_migrations, get_latest_migration_version, migrate, ConnectionTrait,
    MigrationCommand, SEEDED_ROLES,
};
use sea_orm_migration::sea_orm::{ConnectOptions, Database, DatabaseConnection, Statement};

// One pooled connection; every sqlite memory connection is its own database.
async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opts).await.expect("open in-memory sqlite")
}

async fn role_names(db: &DatabaseConnection) -> Vec<String> {
    let rows = db
        .query_all(Statement::from_string(
            db.get_database_backend(),
            "SELECT name FROM roles ORDER BY id".to_owned(),
        ))
        .await
        .expect("query roles");
    rows.into_iter()
        .map(|r| r.try_get::<String>("", "name").expect("name column"))
        .collect()
}

#[tokio::test]
async fn up_creates_schema_and_seeds_roles() {
    let db = memory_db().await;
    assert_eq!(count_applied_migrations(&db).await.unwrap(), 0);

    migrate(&db, MigrationCommand::Up).await.unwrap();

    assert_eq!(count_applied_migrations(&db).await.unwrap(), 1);
    assert_eq!(
        get_latest_migration_version(&db).await.unwrap().as_deref(),
        Some("m20251019_000001_init")
    );
    assert_eq!(role_names(&db).await, SEEDED_ROLES.to_vec());
}

#[tokio::test]
async fn refresh_reseeds_roles_once() {
    let db = memory_db().await;
    migrate(&db, MigrationCommand::Up).await.unwrap();
    migrate(&db, MigrationCommand::Refresh).await.unwrap();

    assert_eq!(role_names(&db).await.len(), SEEDED_ROLES.len());
}

#[tokio::test]
async fn reset_drops_everything() {
    let db = memory_db().await;
    migrate(&db, MigrationCommand::Up).await.unwrap();
    migrate(&db, MigrationCommand::Reset).await.unwrap();

    assert_eq!(count_applied_migrations(&db).await.unwrap(), 0);
    let exists = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT name FROM sqlite_master WHERE type='table' AND name='events'".to_owned(),
        ))
        .await
        .unwrap();
    assert!(exists.is_none());
}

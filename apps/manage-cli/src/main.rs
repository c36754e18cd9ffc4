use clap::{Parser, Subcommand, ValueEnum};
use ems_backend::config::db::{DbKind, DbOwner, DbProfile};
use ems_backend::domain::Role;
use ems_backend::error::AppError;
use ems_backend::infra::db::connect_db;
use ems_backend::repos::roles;
use ems_backend::services::accounts::AccountService;
use ems_backend::services::admin_users::AdminUserService;
use migration::{migrate, MigrationCommand};
use sea_orm::{DatabaseConnection, TransactionTrait};

#[derive(Clone, Copy, ValueEnum)]
enum Env {
    Prod,
    Test,
}

// In-memory SQLite is left out: the database would vanish when the command exits.
#[derive(Clone, Copy, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Clone, Copy, ValueEnum)]
enum MigrateAction {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<MigrateAction> for MigrationCommand {
    fn from(action: MigrateAction) -> Self {
        match action {
            MigrateAction::Up => MigrationCommand::Up,
            MigrateAction::Down => MigrationCommand::Down,
            MigrateAction::Fresh => MigrationCommand::Fresh,
            MigrateAction::Reset => MigrationCommand::Reset,
            MigrateAction::Refresh => MigrationCommand::Refresh,
            MigrateAction::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run a schema migration command
    Migrate {
        #[arg(value_enum)]
        action: MigrateAction,
    },
    /// Make sure the Admin, Organizer and Participant groups exist
    SetupRoles,
    /// Create an active, verified superuser in the Admin group
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Add the Admin group to a user (default: the first superuser)
    AssignAdmin {
        #[arg(long)]
        username: Option<String>,
    },
}

#[derive(Parser)]
#[command(name = "ems-manage")]
#[command(about = "EMS database and account management")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "prod", global = true)]
    env: Env,

    /// Database type
    #[arg(short, long, value_enum, default_value = "postgres", global = true)]
    db: Db,
}

async fn run(args: Args) -> Result<(), AppError> {
    let profile = match args.env {
        Env::Prod => DbProfile::Prod,
        Env::Test => DbProfile::Test,
    };
    let kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };

    match args.command {
        Command::Migrate { action } => {
            let conn = connect_db(kind, profile, DbOwner::Owner).await?;
            migrate(&conn, action.into())
                .await
                .map_err(|e| AppError::config(format!("migration failed: {e}")))?;
        }
        Command::SetupRoles => {
            let conn = connect_db(kind, profile, DbOwner::App).await?;
            for (role, created) in roles::ensure_roles(&conn).await? {
                let name = role.as_str();
                let state = if created { "created" } else { "exists" };
                println!(
                    "{name:<12} {state:<8} {} permissions",
                    role.permissions().len()
                );
            }
        }
        Command::CreateSuperuser {
            username,
            email,
            password,
        } => {
            let conn = connect_db(kind, profile, DbOwner::App).await?;
            let user = in_txn(&conn, |txn| {
                Box::pin(async move {
                    AccountService::new()
                        .create_superuser(txn, &username, &email, &password)
                        .await
                })
            })
            .await?;
            println!("Superuser '{}' created (id {})", user.username, user.id);
        }
        Command::AssignAdmin { username } => {
            let conn = connect_db(kind, profile, DbOwner::App).await?;
            let user = in_txn(&conn, |txn| {
                Box::pin(async move {
                    AdminUserService::new()
                        .assign_admin(txn, username.as_deref())
                        .await
                })
            })
            .await?;
            println!("'{}' is now in the {} group", user.username, Role::Admin);
        }
    }
    Ok(())
}

/// Commit on success, roll back on error.
async fn in_txn<R, F>(conn: &DatabaseConnection, f: F) -> Result<R, AppError>
where
    F: for<'c> FnOnce(&'c sea_orm::DatabaseTransaction) -> ems_backend::db::txn::TxnFuture<'c, R>,
{
    let txn = conn.begin().await?;
    match f(&txn).await {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(e) => {
            let _ = txn.rollback().await;
            Err(e)
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("ems_backend=info,migration=info,sqlx=warn")
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

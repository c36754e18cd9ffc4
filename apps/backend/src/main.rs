use actix_web::{web, App, HttpServer};
use ems_backend::config::db::{DbKind, DbProfile};
use ems_backend::config::email::EmailConfig;
use ems_backend::config::server::ServerConfig;
use ems_backend::infra::state::build_state;
use ems_backend::middleware::access_log::AccessLog;
use ems_backend::middleware::cors::cors_middleware;
use ems_backend::middleware::request_trace::RequestTrace;
use ems_backend::routes;
use ems_backend::state::security_config::SecurityConfig;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker compose env_file, or `set -a; . ./.env; set +a` locally).
    let server = match ServerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };
    let (db_kind, email) = match (DbKind::from_env(), EmailConfig::from_env()) {
        (Ok(kind), Ok(email)) => (kind, email),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "invalid database or email configuration");
            std::process::exit(1);
        }
    };

    let security_config = SecurityConfig::new(server.jwt_secret.as_bytes())
        .with_token_ttl_secs(server.token_ttl_secs);

    let app_state = match build_state()
        .with_db(db_kind)
        .with_profile(DbProfile::Prod)
        .with_security(security_config)
        .with_email(email)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(host = %server.host, port = server.port, db = ?db_kind, "starting EMS backend");

    let data = web::Data::new(app_state);
    let origins = server.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(AccessLog)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}

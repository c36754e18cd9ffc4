use actix_web::web;

pub mod accounts;
pub mod admin;
pub mod categories;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod views;

/// Register every endpoint. Shared by `main.rs` and the test app builder.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    cfg.service(
        web::scope("/api")
            .service(web::scope("/accounts").configure(accounts::configure_routes))
            .service(web::scope("/categories").configure(categories::configure_routes))
            .service(web::scope("/dashboard").configure(dashboard::configure_routes))
            .service(web::scope("/admin").configure(admin::configure_routes))
            // /api/home and /api/events/**
            .configure(events::configure_routes),
    );
}

//! Business rules over the repositories. Every method takes a connection
//! (usually the request transaction) and returns `AppError`.

pub mod accounts;
pub mod admin_users;
pub mod categories;
pub mod dashboards;
pub mod events;
pub mod rsvps;

//! SeaORM adapters. Functions return raw `DbErr`; repos translate.

pub mod categories_sea;
pub mod events_sea;
pub mod roles_sea;
pub mod rsvps_sea;
pub mod users_sea;

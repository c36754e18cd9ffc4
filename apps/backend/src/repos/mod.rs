//! Repositories: domain models over the SeaORM adapters.
//!
//! Every function is generic over `ConnectionTrait` so it runs equally on a
//! pool or inside `with_txn`.

pub mod categories;
pub mod events;
pub mod roles;
pub mod rsvps;
pub mod users;

//! Domain layer: pure rules with no HTTP or database dependencies.

pub mod roles;
pub mod schedule;
pub mod validation;

#[cfg(test)]
mod tests_props_validation;

pub use roles::{primary_role, primary_role_label, Action, Permission, Resource, Role, NO_ROLE};

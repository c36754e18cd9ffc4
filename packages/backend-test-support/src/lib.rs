//! Backend test support utilities
//!
//! Shared by the backend's integration tests: one-time logging setup,
//! unique test data and Problem Details assertions.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;

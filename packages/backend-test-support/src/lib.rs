//! Shared helpers for backend unit and integration tests:
//! logging init, ProblemDetails assertions and unique test data.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;

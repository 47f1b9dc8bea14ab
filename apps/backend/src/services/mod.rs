//! Use-case layer between the HTTP routes and the repos.
//!
//! Services take a connection (or `AppState` when they need more than the
//! database) and return `AppError`, so routes stay thin.

pub mod admin;
pub mod api_keys;
pub mod auth;
pub mod cities;
pub mod deep_reports;
pub mod forecast_coordinator;
pub mod forecasts;
pub mod products;
pub mod subscriptions;

#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod agents;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

pub use auth::{mint_access_token, mint_refresh_token, verify_token, Claims, TokenType};
pub use config::Settings;
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use extractors::{AdminUser, CurrentUser, ValidatedJson};
pub use infra::state::build_state;
pub use middleware::{
    cors_middleware, JwtExtract, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
pub use services::forecast_coordinator::ForecastCoordinator;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}

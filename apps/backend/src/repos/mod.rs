//! Repository functions for the service layer (generic over ConnectionTrait).

pub mod agent_logs;
pub mod api_keys;
pub mod cities;
pub mod deep_reports;
pub mod forecasts;
pub mod payments;
pub mod products;
pub mod subscriptions;
pub mod users;

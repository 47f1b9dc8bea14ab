//! SeaORM adapters. Functions here return `DbErr`; the repos layer maps
//! them to `DomainError`.

pub mod agent_logs_sea;
pub mod api_keys_sea;
pub mod cities_sea;
pub mod deep_reports_sea;
pub mod forecasts_sea;
pub mod payments_sea;
pub mod products_sea;
pub mod subscriptions_sea;
pub mod users_sea;

/// Offset/limit window shared by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }
}

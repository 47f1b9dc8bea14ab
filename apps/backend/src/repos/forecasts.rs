//! Forecast repository functions.
//!
//! Forecast rows are wide and written almost entirely by the pipeline, so the
//! entity model doubles as the domain model.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::forecasts_sea as forecasts_adapter;
use crate::adapters::Page;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use crate::entities::forecasts::{ForecastStatus, Model as Forecast};
pub use forecasts_adapter::{AgentSections, ForecastResults};

pub async fn create_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
) -> Result<Forecast, DomainError> {
    Ok(forecasts_adapter::create_pending(conn, user_id, product_id).await?)
}

pub async fn require_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    forecast_id: i64,
) -> Result<Forecast, DomainError> {
    forecasts_adapter::find_owned(conn, user_id, forecast_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Forecast,
                format!("Forecast {forecast_id} not found"),
            )
        })
}

pub async fn list_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    page: Page,
) -> Result<(Vec<Forecast>, u64), DomainError> {
    Ok(forecasts_adapter::list_owned(conn, user_id, page).await?)
}

pub async fn mark_processing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    forecast_id: i64,
    started_at: OffsetDateTime,
) -> Result<Forecast, DomainError> {
    Ok(forecasts_adapter::mark_processing(conn, forecast_id, started_at).await?)
}

pub async fn mark_failed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    forecast_id: i64,
    error_message: String,
    duration_seconds: f64,
) -> Result<Forecast, DomainError> {
    Ok(forecasts_adapter::mark_failed(conn, forecast_id, error_message, duration_seconds).await?)
}

pub async fn store_results<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    forecast_id: i64,
    results: ForecastResults,
) -> Result<Forecast, DomainError> {
    Ok(forecasts_adapter::store_results(conn, forecast_id, results).await?)
}

pub async fn count_forecasts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, DomainError> {
    Ok(forecasts_adapter::count_forecasts(conn).await?)
}

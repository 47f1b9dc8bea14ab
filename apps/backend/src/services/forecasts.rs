//! Forecast creation, lookup and agent log listing.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::adapters::Page;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::cities::{city_budget, select_for_forecast};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::agent_logs::{self, AgentLog};
use crate::repos::forecasts::{self, Forecast};
use crate::repos::{cities, products, subscriptions};
use crate::services::forecast_coordinator::ForecastCoordinator;
use crate::state::app_state::AppState;

pub const DEFAULT_MAX_CITIES: u64 = 10;
pub const MAX_CITIES_RANGE: std::ops::RangeInclusive<u64> = 1..=100;

/// Create a forecast for an owned product and run the agent pipeline to
/// completion before returning the final row.
///
/// Users with a subscription spend one forecast from their monthly quota
/// and are capped at their plan's city limit.
pub async fn create(
    state: &AppState,
    user_id: i64,
    product_id: i64,
    max_cities: Option<u64>,
) -> Result<Forecast, AppError> {
    let max_cities = max_cities.unwrap_or(DEFAULT_MAX_CITIES);
    if !MAX_CITIES_RANGE.contains(&max_cities) {
        return Err(DomainError::validation_other(format!(
            "max_cities must be between {} and {}",
            MAX_CITIES_RANGE.start(),
            MAX_CITIES_RANGE.end()
        ))
        .into());
    }

    let db = require_db(state)?;
    let product = products::require_owned(db, user_id, product_id).await?;

    let subscription = subscriptions::find_by_user(db, user_id).await?;
    if subscription.as_ref().is_some_and(|s| !s.has_forecast_quota()) {
        return Err(subscriptions::quota_exceeded().into());
    }

    let settings = &state.settings;
    let budget = city_budget(
        max_cities,
        subscription
            .as_ref()
            .map(|s| u64::try_from(s.cities_limit).unwrap_or(0)),
        settings.max_cities_per_forecast,
    );
    let candidates = cities::list_with_min_population(db, settings.min_city_population).await?;
    let selected = select_for_forecast(candidates, settings.min_city_population, budget);
    if selected.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::NoCitiesAvailable,
            "No cities available for analysis",
        )
        .into());
    }

    let subscription_id = subscription.as_ref().map(|s| s.id);
    let forecast = with_txn(state, move |txn| {
        Box::pin(async move {
            if let Some(id) = subscription_id {
                subscriptions::spend_forecast(txn, id).await?;
            }
            Ok(forecasts::create_pending(txn, user_id, product_id).await?)
        })
    })
    .await?;
    info!(
        forecast_id = forecast.id,
        product_id,
        cities = selected.len(),
        "forecast created"
    );

    ForecastCoordinator::from_state(state)?
        .run(forecast, &product, &selected)
        .await
}

pub async fn get<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    forecast_id: i64,
) -> Result<Forecast, AppError> {
    Ok(forecasts::require_owned(conn, user_id, forecast_id).await?)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    page: Page,
) -> Result<(Vec<Forecast>, u64), AppError> {
    Ok(forecasts::list_owned(conn, user_id, page).await?)
}

pub async fn agent_logs<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    forecast_id: i64,
) -> Result<Vec<AgentLog>, AppError> {
    forecasts::require_owned(conn, user_id, forecast_id).await?;
    Ok(agent_logs::list_for_forecast(conn, forecast_id).await?)
}

//! Paid deep reports built from a completed forecast.

use sea_orm::ConnectionTrait;
use serde_json::{json, Value};
use tracing::info;

use crate::config::settings::DeepReportPrices;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::payments::{PaymentStatus, PaymentType};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::deep_reports::{self, DeepReport, DeepReportCreate, ReportType};
use crate::repos::forecasts::{self, Forecast, ForecastStatus};
use crate::repos::payments::{self, PaymentCreate};
use crate::state::app_state::AppState;

const REPORT_CURRENCY: &str = "USD";

pub fn price_cents(prices: &DeepReportPrices, report_type: ReportType) -> i64 {
    match report_type {
        ReportType::Standard => prices.standard,
        ReportType::Premium => prices.premium,
        ReportType::Enterprise => prices.enterprise,
    }
}

fn report_label(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Standard => "Standard",
        ReportType::Premium => "Premium",
        ReportType::Enterprise => "Enterprise",
    }
}

/// Agent sections and headline scores of a forecast.
pub fn report_data(forecast: &Forecast) -> Value {
    json!({
        "forecast_id": forecast.id,
        "scores": {
            "overall": forecast.overall_score,
            "demand": forecast.demand_score,
            "competition": forecast.competition_index,
            "profitability": forecast.profitability_score,
            "market_fit": forecast.market_fit_score,
            "risk": forecast.risk_score,
        },
        "pricing": {
            "recommended": forecast.recommended_price,
            "min": forecast.recommended_price_min,
            "max": forecast.recommended_price_max,
            "elasticity": forecast.price_elasticity,
        },
        "city_rankings": forecast.city_rankings,
        "product_analysis": forecast.product_analysis_data,
        "market_analysis": forecast.market_analysis_data,
        "advertising_strategy": forecast.advertising_strategy_data,
        "supply_chain": forecast.supply_chain_data,
        "sales_strategy": forecast.sales_strategy_data,
    })
}

/// Non-empty agent summaries, in pipeline order, separated by blank lines.
pub fn executive_summary(forecast: &Forecast) -> String {
    [
        &forecast.product_analysis_summary,
        &forecast.market_analysis_summary,
        &forecast.advertising_strategy_summary,
        &forecast.supply_chain_summary,
        &forecast.sales_strategy_summary,
    ]
    .into_iter()
    .filter_map(|s| s.as_deref())
    .filter(|s| !s.trim().is_empty())
    .collect::<Vec<_>>()
    .join("\n\n")
}

pub async fn purchase(
    state: &AppState,
    user_id: i64,
    forecast_id: i64,
    report_type: ReportType,
) -> Result<DeepReport, AppError> {
    let forecast = forecasts::require_owned(require_db(state)?, user_id, forecast_id).await?;
    if forecast.status != ForecastStatus::Completed {
        return Err(DomainError::conflict(
            ConflictKind::ForecastNotCompleted,
            "Forecast must be completed before ordering a deep report",
        )
        .into());
    }

    let amount = price_cents(&state.settings.deep_report_prices, report_type);
    let label = report_label(report_type);
    let data = report_data(&forecast);
    let summary = executive_summary(&forecast);

    let report = with_txn(state, move |txn| {
        Box::pin(async move {
            let payment = payments::create_payment(
                txn,
                PaymentCreate {
                    user_id,
                    payment_type: PaymentType::DeepReport,
                    status: PaymentStatus::Succeeded,
                    amount,
                    currency: REPORT_CURRENCY.to_string(),
                    description: Some(format!("{label} deep report for forecast {forecast_id}")),
                    item_name: Some(format!("{label} Deep Report")),
                    checkout_session_id: None,
                },
            )
            .await?;

            let report = deep_reports::create_report(
                txn,
                DeepReportCreate {
                    user_id,
                    forecast_id,
                    payment_id: Some(payment.id),
                    report_type,
                    price_paid: payment.amount_in_dollars(),
                    currency: REPORT_CURRENCY.to_string(),
                    report_data: data,
                    executive_summary: Some(summary),
                },
            )
            .await?;
            Ok(report)
        })
    })
    .await?;

    info!(user_id, forecast_id, report_id = report.id, report_type = label, "deep report created");
    Ok(report)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    forecast_id: i64,
) -> Result<Vec<DeepReport>, AppError> {
    forecasts::require_owned(conn, user_id, forecast_id).await?;
    Ok(deep_reports::list_for_forecast(conn, user_id, forecast_id).await?)
}

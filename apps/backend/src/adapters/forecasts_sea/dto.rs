//! DTOs for forecasts_sea adapter.

use serde_json::Value;
use time::OffsetDateTime;

/// Everything a completed pipeline run writes back to the forecast row.
#[derive(Debug, Clone, Default)]
pub struct ForecastResults {
    pub target_city_id: Option<i64>,
    pub demand_score: f64,
    pub competition_index: f64,
    pub profitability_score: f64,
    pub market_fit_score: f64,
    pub risk_score: f64,
    pub overall_score: f64,
    pub expected_monthly_sales_volume: i64,
    pub expected_annual_revenue: f64,
    pub expected_profit_margin: f64,
    pub recommended_price: f64,
    pub recommended_price_min: f64,
    pub recommended_price_max: f64,
    pub price_elasticity: String,
    pub city_rankings: Value,
    pub summaries: AgentSections<String>,
    pub data: AgentSections<Value>,
    pub model_version: String,
    pub tokens_used: i64,
    pub cost_usd: f64,
    pub completed_at: Option<OffsetDateTime>,
    pub duration_seconds: f64,
}

/// One slot per agent, in pipeline order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentSections<T> {
    pub product: T,
    pub market: T,
    pub advertising: T,
    pub supply_chain: T,
    pub sales: T,
}

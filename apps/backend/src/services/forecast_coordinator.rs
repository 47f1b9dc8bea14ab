//! Runs the five-agent pipeline for one forecast and writes the results.
//!
//! Product analysis and market profiling run in sequence because later
//! agents depend on them; advertising, supply chain and sales run
//! concurrently. Every run is bounded by the shared agent semaphore and
//! leaves an `agent_logs` row. The coordinator never holds a transaction
//! across an agent call.

use std::sync::Arc;
use std::time::Instant;

use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::agents::registry::by_kind;
use crate::agents::{execute, AgentKind, AgentOutput, AgentRuntime};
use crate::db::require_db;
use crate::domain::cities::City;
use crate::domain::forecast_engine::calculate_forecast_scores;
use crate::error::AppError;
use crate::repos::agent_logs::{self, AgentLogCreate};
use crate::repos::forecasts::{self, AgentSections, Forecast, ForecastResults};
use crate::repos::products::Product;
use crate::state::app_state::AppState;

const AD_BUDGET_MIN: f64 = 1000.0;
const AD_BUDGET_MAX: f64 = 5000.0;
const SUPPLY_TARGET_VOLUME: u64 = 1000;
const SUPPLY_COST_RATIO: f64 = 0.3;

pub struct ForecastCoordinator {
    db: DatabaseConnection,
    runtime: AgentRuntime,
    permits: Arc<Semaphore>,
}

impl ForecastCoordinator {
    pub fn new(db: DatabaseConnection, runtime: AgentRuntime, permits: Arc<Semaphore>) -> Self {
        Self {
            db,
            runtime,
            permits,
        }
    }

    pub fn from_state(state: &AppState) -> Result<Self, AppError> {
        Ok(Self::new(
            require_db(state)?.clone(),
            state.agent_runtime(),
            state.agent_permits.clone(),
        ))
    }

    /// Drive `forecast` to `completed` or `failed` and return the final row.
    ///
    /// Only database errors surface as `Err`; agent failures end up in the
    /// row itself. A database error also marks the row failed, best effort,
    /// so it never stays `processing`.
    pub async fn run(
        &self,
        forecast: Forecast,
        product: &Product,
        cities: &[City],
    ) -> Result<Forecast, AppError> {
        let forecast_id = forecast.id;
        let started = Instant::now();
        match self.drive(forecast, product, cities, started).await {
            Ok(done) => Ok(done),
            Err(err) => {
                self.abandon(forecast_id, &err, started).await;
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        forecast: Forecast,
        product: &Product,
        cities: &[City],
        started: Instant,
    ) -> Result<Forecast, AppError> {
        let forecast =
            forecasts::mark_processing(&self.db, forecast.id, OffsetDateTime::now_utc()).await?;
        info!(forecast_id = forecast.id, cities = cities.len(), "forecast=processing");

        let product_out = self
            .run_agent(forecast.id, AgentKind::ProductAnalyst, product_input(product))
            .await?;
        if !product_out.success {
            return self.fail(&forecast, "Product analysis", &product_out, started).await;
        }

        let market_input = market_input(product, &product_out.data, cities);
        let market_out = self
            .run_agent(forecast.id, AgentKind::MarketProfiler, market_input)
            .await?;
        if !market_out.success {
            return self.fail(&forecast, "Market analysis", &market_out, started).await;
        }

        let top_city = market_out.data["city_rankings"][0]["city_name"]
            .as_str()
            .map(str::to_string);

        let (advertising, supply_chain, sales) = futures::join!(
            self.run_agent(
                forecast.id,
                AgentKind::AdvertisingPlanner,
                advertising_input(product, &product_out.data, top_city.as_deref()),
            ),
            self.run_agent(
                forecast.id,
                AgentKind::SupplyChainAdvisor,
                supply_chain_input(product, top_city.as_deref()),
            ),
            self.run_agent(
                forecast.id,
                AgentKind::SalesStrategy,
                sales_input(product, &product_out.data, &market_out.data),
            ),
        );
        let (advertising, supply_chain, sales) = (advertising?, supply_chain?, sales?);

        let scores = calculate_forecast_scores(&product_out.data, &market_out.data);
        let outputs = [&product_out, &market_out, &advertising, &supply_chain, &sales];
        let tokens_used: u64 = outputs.iter().map(|o| o.tokens_used).sum();
        let cost_usd: f64 = outputs.iter().map(|o| o.cost_usd).sum();
        let duration_seconds = started.elapsed().as_secs_f64();

        let results = ForecastResults {
            target_city_id: top_city.as_deref().and_then(|name| city_id_for(cities, name)),
            demand_score: scores.demand_score,
            competition_index: scores.competition_index,
            profitability_score: scores.profitability_score,
            market_fit_score: scores.market_fit_score,
            risk_score: scores.risk_score,
            overall_score: scores.overall_score,
            expected_monthly_sales_volume: scores.expected_monthly_sales_volume,
            expected_annual_revenue: scores.expected_annual_revenue,
            expected_profit_margin: scores.expected_profit_margin,
            recommended_price: scores.recommended_price,
            recommended_price_min: scores.recommended_price_min,
            recommended_price_max: scores.recommended_price_max,
            price_elasticity: scores.price_elasticity.as_str().to_string(),
            city_rankings: scores.city_rankings,
            summaries: AgentSections {
                product: product_out.summary_or_empty().to_string(),
                market: market_out.summary_or_empty().to_string(),
                advertising: advertising.summary_or_empty().to_string(),
                supply_chain: supply_chain.summary_or_empty().to_string(),
                sales: sales.summary_or_empty().to_string(),
            },
            data: AgentSections {
                product: product_out.data_or_empty(),
                market: market_out.data_or_empty(),
                advertising: advertising.data_or_empty(),
                supply_chain: supply_chain.data_or_empty(),
                sales: sales.data_or_empty(),
            },
            model_version: self.runtime.model.clone(),
            tokens_used: i64::try_from(tokens_used).unwrap_or(i64::MAX),
            cost_usd: (cost_usd * 1_000_000.0).round() / 1_000_000.0,
            completed_at: Some(OffsetDateTime::now_utc()),
            duration_seconds,
        };

        let done = forecasts::store_results(&self.db, forecast.id, results).await?;
        info!(
            forecast_id = done.id,
            overall_score = ?done.overall_score,
            tokens_used,
            duration_seconds,
            "forecast=completed"
        );
        Ok(done)
    }

    async fn run_agent(
        &self,
        forecast_id: i64,
        kind: AgentKind,
        input: Value,
    ) -> Result<AgentOutput, AppError> {
        let factory = by_kind(kind)
            .ok_or_else(|| AppError::internal(format!("agent {kind} is not registered")))?;
        let agent = (factory.make)();

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AppError::internal("agent pool closed"))?;
        let started_at = OffsetDateTime::now_utc();
        let output = execute(agent.as_ref(), &input, &self.runtime).await;

        agent_logs::create_log(&self.db, log_entry(forecast_id, input, &output, started_at)).await?;
        Ok(output)
    }

    async fn abandon(&self, forecast_id: i64, err: &AppError, started: Instant) {
        let message = format!("Forecast processing failed: {err}");
        warn!(forecast_id, error = %message, "forecast=failed");
        if let Err(mark_err) = forecasts::mark_failed(
            &self.db,
            forecast_id,
            message,
            started.elapsed().as_secs_f64(),
        )
        .await
        {
            warn!(forecast_id, error = %mark_err, "could not mark forecast failed");
        }
    }

    async fn fail(
        &self,
        forecast: &Forecast,
        phase: &str,
        output: &AgentOutput,
        started: Instant,
    ) -> Result<Forecast, AppError> {
        let reason = output.error.as_deref().unwrap_or("unknown error");
        let message = format!("{phase} failed: {reason}");
        warn!(forecast_id = forecast.id, error = %message, "forecast=failed");
        Ok(forecasts::mark_failed(
            &self.db,
            forecast.id,
            message,
            started.elapsed().as_secs_f64(),
        )
        .await?)
    }
}

fn log_entry(
    forecast_id: i64,
    input: Value,
    output: &AgentOutput,
    started_at: OffsetDateTime,
) -> AgentLogCreate {
    let to_i64 = |n: u64| i64::try_from(n).unwrap_or(i64::MAX);
    AgentLogCreate {
        forecast_id,
        agent_kind: output.agent_kind.as_str().to_string(),
        agent_name: output.agent_name.clone(),
        is_successful: output.success,
        error_message: output.error.clone(),
        started_at,
        completed_at: OffsetDateTime::now_utc(),
        execution_time_ms: to_i64(output.execution_time_ms),
        input_data: input,
        output_data: output.data.clone(),
        summary: output.summary.clone(),
        model_name: Some(output.model_name.clone()),
        tokens_used: to_i64(output.tokens_used),
        prompt_tokens: to_i64(output.prompt_tokens),
        completion_tokens: to_i64(output.completion_tokens),
        cost_usd: output.cost_usd,
        reasoning_steps: output.reasoning_steps.clone(),
        confidence_score: output.confidence_score,
        retry_count: i32::try_from(output.retry_count).unwrap_or(i32::MAX),
    }
}

fn city_id_for(cities: &[City], name: &str) -> Option<i64> {
    cities
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.id)
}

fn product_input(product: &Product) -> Value {
    json!({
        "product_name": product.name,
        "description": product.description,
        "category": product.category,
        "base_price": product.base_price,
        "currency": product.currency,
        "production_method": product.production_method,
        "target_market": product.target_market,
        "quality_tier": product.quality_tier,
        "specifications": product.specifications,
    })
}

fn target_demographics(product_analysis: &Value) -> Value {
    product_analysis["demand_analysis"]["target_demographics"].clone()
}

fn market_input(product: &Product, product_analysis: &Value, cities: &[City]) -> Value {
    let cities: Vec<Value> = cities
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "country": c.country,
                "region": c.region,
                "population": c.population,
                "gdp_per_capita": c.gdp_per_capita,
                "purchasing_power_index": c.purchasing_power_index,
                "ecommerce_penetration": c.ecommerce_penetration,
                "competition_density": c.competition_density,
            })
        })
        .collect();

    json!({
        "product_category": product.category,
        "price_point": product.base_price,
        "target_demographics": target_demographics(product_analysis),
        "cities": cities,
    })
}

fn advertising_input(product: &Product, product_analysis: &Value, top_city: Option<&str>) -> Value {
    json!({
        "product_name": product.name,
        "product_category": product.category,
        "price": product.base_price,
        "target_city": top_city,
        "target_demographics": target_demographics(product_analysis),
        "budget_range": {"min": AD_BUDGET_MIN, "max": AD_BUDGET_MAX},
        "campaign_objective": "conversion",
    })
}

fn supply_chain_input(product: &Product, top_city: Option<&str>) -> Value {
    json!({
        "product_name": product.name,
        "product_category": product.category,
        "specifications": product.specifications,
        "target_volume": SUPPLY_TARGET_VOLUME,
        "quality_requirements": product.quality_tier.as_deref().unwrap_or("standard"),
        "target_cost": product.base_price * SUPPLY_COST_RATIO,
        "target_market": top_city.unwrap_or("Global"),
    })
}

fn sales_input(product: &Product, product_analysis: &Value, market_analysis: &Value) -> Value {
    let competition = market_analysis["competitive_landscape"]["competition_intensity"]
        .as_str()
        .unwrap_or("moderate");
    json!({
        "product_name": product.name,
        "product_category": product.category,
        "price": product.base_price,
        "unique_selling_points": product_analysis["market_fit"]["unique_selling_points"],
        "target_audience": target_demographics(product_analysis),
        "competition_level": competition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cities::fixtures::city;
    use crate::entities::products::ProductCategory;

    fn product() -> Product {
        let now = OffsetDateTime::now_utc();
        Product {
            id: 7,
            user_id: 1,
            name: "Trail Bottle".to_string(),
            description: None,
            category: ProductCategory::SportsOutdoors,
            base_price: 20.0,
            currency: "USD".to_string(),
            production_method: None,
            target_market: None,
            quality_tier: None,
            specifications: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn supply_chain_targets_thirty_percent_cost_and_global_fallback() {
        let input = supply_chain_input(&product(), None);
        assert_eq!(input["target_cost"], 6.0);
        assert_eq!(input["target_volume"], 1000);
        assert_eq!(input["target_market"], "Global");
        assert_eq!(input["quality_requirements"], "standard");
    }

    #[test]
    fn sales_competition_defaults_to_moderate() {
        let input = sales_input(&product(), &json!({}), &json!({}));
        assert_eq!(input["competition_level"], "moderate");

        let market = json!({"competitive_landscape": {"competition_intensity": "high"}});
        assert_eq!(sales_input(&product(), &json!({}), &market)["competition_level"], "high");
    }

    #[test]
    fn market_input_carries_category_and_cities() {
        let analysis = json!({"demand_analysis": {"target_demographics": ["students"]}});
        let input = market_input(&product(), &analysis, &[city(3, "Leipzig", 600_000, 90.0)]);
        assert_eq!(input["product_category"], "sports_outdoors");
        assert_eq!(input["target_demographics"][0], "students");
        assert_eq!(input["cities"][0]["name"], "Leipzig");
        assert_eq!(input["cities"][0]["id"], 3);
    }

    #[test]
    fn top_city_matches_case_insensitively() {
        let cities = [city(1, "Leipzig", 600_000, 90.0), city(2, "Dresden", 550_000, 95.0)];
        assert_eq!(city_id_for(&cities, "dresden"), Some(2));
        assert_eq!(city_id_for(&cities, "Paris"), None);
    }
}

//! Scoring engine: turns the product and market analyses into forecast
//! scores, sales estimates and pricing. Pure; no I/O.

use serde::Serialize;
use serde_json::Value;

use crate::agents::parsing::{at, num_at, str_at};

const W_DEMAND: f64 = 0.40;
const W_PROFITABILITY: f64 = 0.30;
const W_COMPETITION: f64 = 0.20;
const W_MARKET_FIT: f64 = 0.10;

/// Average selling price assumed by the revenue estimate.
const AVG_PRICE: f64 = 50.0;
const TOP_RANKINGS: usize = 10;

const DEFAULT_PRICING: (f64, f64, f64) = (50.0, 40.0, 60.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastScores {
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
    pub price_elasticity: PriceElasticity,
    /// First ten entries of the market profiler's ranking
    pub city_rankings: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceElasticity {
    Inelastic,
    Elastic,
    Neutral,
}

impl PriceElasticity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inelastic => "inelastic",
            Self::Elastic => "elastic",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesEstimate {
    pub monthly_volume: i64,
    pub annual_revenue: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingRecommendation {
    pub recommended: f64,
    pub min: f64,
    pub max: f64,
    pub elasticity: PriceElasticity,
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn clamp_score(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

fn market_size_score(size: &str) -> f64 {
    match size.to_lowercase().as_str() {
        "small" => 30.0,
        "medium" => 60.0,
        "large" => 85.0,
        "very large" => 95.0,
        _ => 60.0,
    }
}

fn maturity_multiplier(maturity: &str) -> f64 {
    match maturity.to_lowercase().as_str() {
        "emerging" => 0.7,
        "growing" => 0.85,
        "mature" => 1.0,
        "saturated" => 1.2,
        _ => 1.0,
    }
}

fn maturity_risk(maturity: &str) -> f64 {
    match maturity.to_lowercase().as_str() {
        "emerging" => 45.0,
        "growing" => 25.0,
        "mature" => 15.0,
        "saturated" => 60.0,
        _ => 30.0,
    }
}

fn entry_risk(difficulty: &str) -> f64 {
    match difficulty.to_lowercase().as_str() {
        "easy" => 10.0,
        "moderate" => 30.0,
        "challenging" => 60.0,
        _ => 30.0,
    }
}

fn base_monthly_volume(size: &str) -> f64 {
    match size.to_lowercase().as_str() {
        "small" => 50.0,
        "medium" => 200.0,
        "large" => 800.0,
        "very large" => 2000.0,
        _ => 200.0,
    }
}

fn quality_multiplier(tier: &str) -> f64 {
    match tier.to_lowercase().as_str() {
        "premium" => 1.3,
        "budget" => 0.7,
        _ => 1.0,
    }
}

pub fn demand_score(
    product_demand: f64,
    market_size: &str,
    ecommerce_readiness: f64,
    demographic_match: f64,
) -> f64 {
    clamp_score(
        product_demand * 0.4
            + market_size_score(market_size) * 0.3
            + ecommerce_readiness * 0.2
            + demographic_match * 0.1,
    )
}

/// Higher means more competition.
pub fn competition_index(competition_score: f64, maturity: &str) -> f64 {
    clamp_score(competition_score * maturity_multiplier(maturity))
}

pub fn profitability_score(purchasing_power: f64, quality: f64, competition: f64) -> f64 {
    clamp_score(purchasing_power * 0.45 + quality * 0.35 + (100.0 - competition) * 0.20)
}

/// Higher means riskier entry.
pub fn risk_score(competition: f64, maturity: &str, entry_difficulty: &str) -> f64 {
    clamp_score(
        competition * 0.5 + maturity_risk(maturity) * 0.3 + entry_risk(entry_difficulty) * 0.2,
    )
}

pub fn overall_score(demand: f64, profitability: f64, competition: f64, market_fit: f64) -> f64 {
    clamp_score(
        W_DEMAND * demand
            + W_PROFITABILITY * profitability
            + W_COMPETITION * (100.0 - competition)
            + W_MARKET_FIT * market_fit,
    )
}

pub fn estimate_sales(demand: f64, market_size: &str, competition: f64) -> SalesEstimate {
    let monthly_volume = (base_monthly_volume(market_size) * (demand / 50.0)
        * ((100.0 - competition) / 50.0))
        .trunc() as i64;
    let annual_revenue = monthly_volume as f64 * AVG_PRICE * 12.0;
    let profit_margin = (40.0 + (100.0 - competition) * 0.2).clamp(15.0, 70.0);

    SalesEstimate {
        monthly_volume,
        annual_revenue: round2(annual_revenue),
        profit_margin: round2(profit_margin),
    }
}

/// `"a-b"` ranges (with `$` stripped) yield their midpoint, a plain number `p`
/// yields `p` within `0.8p..=1.2p`. Anything else falls back to 50 in 40..=60.
fn base_pricing(optimal_price_range: &Value) -> (f64, f64, f64) {
    match optimal_price_range {
        Value::String(s) if s.contains('-') => {
            let cleaned = s.replace('$', "");
            let mut parts = cleaned.split('-');
            let lo = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
            let hi = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
            match (lo, hi) {
                (Some(lo), Some(hi)) => ((lo + hi) / 2.0, lo, hi),
                _ => DEFAULT_PRICING,
            }
        }
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(p) if p != 0.0 => (p, p * 0.8, p * 1.2),
            _ => DEFAULT_PRICING,
        },
        Value::Number(n) => match n.as_f64() {
            Some(p) if p != 0.0 => (p, p * 0.8, p * 1.2),
            _ => DEFAULT_PRICING,
        },
        _ => DEFAULT_PRICING,
    }
}

pub fn recommend_pricing(optimal_price_range: &Value, quality_tier: &str) -> PricingRecommendation {
    let multiplier = quality_multiplier(quality_tier);
    let (recommended, min, max) = base_pricing(optimal_price_range);

    let elasticity = match quality_tier.to_lowercase().as_str() {
        "premium" => PriceElasticity::Inelastic,
        "budget" => PriceElasticity::Elastic,
        _ => PriceElasticity::Neutral,
    };

    PricingRecommendation {
        recommended: round2(recommended * multiplier),
        min: round2(min * multiplier),
        max: round2(max * multiplier),
        elasticity,
    }
}

/// Score a forecast from the product analyst and market profiler outputs.
///
/// Missing fields fall back to neutral defaults (50 for scores, "medium"
/// market, "mature" maturity, "moderate" entry, "standard" tier).
pub fn calculate_forecast_scores(product: &Value, market: &Value) -> ForecastScores {
    let product_demand = num_at(product, &["demand_analysis", "demand_score"], 50.0);
    let quality = num_at(product, &["quality_assessment", "quality_score"], 50.0);
    let market_fit = num_at(product, &["market_fit", "market_fit_score"], 50.0);
    let quality_tier = str_at(product, &["quality_assessment", "quality_tier"], "standard");

    let rankings: &[Value] = market["city_rankings"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let top_city = rankings.first().unwrap_or(&Value::Null);

    let market_size = str_at(top_city, &["estimated_market_size"], "medium");
    let maturity = str_at(market, &["overall_market_assessment", "market_maturity"], "mature");
    let entry = str_at(
        market,
        &["overall_market_assessment", "entry_difficulty"],
        "moderate",
    );

    let demand = demand_score(
        product_demand,
        &market_size,
        num_at(top_city, &["ecommerce_readiness_score"], 50.0),
        num_at(top_city, &["demographic_match_score"], 50.0),
    );
    let competition = competition_index(num_at(top_city, &["competition_score"], 50.0), &maturity);
    let profitability = profitability_score(
        num_at(top_city, &["purchasing_power_score"], 50.0),
        quality,
        competition,
    );
    let risk = risk_score(competition, &maturity, &entry);
    let overall = overall_score(demand, profitability, competition, market_fit);
    let sales = estimate_sales(demand, &market_size, competition);
    let pricing = recommend_pricing(
        at(product, &["pricing_analysis", "optimal_price_range"]),
        &quality_tier,
    );

    ForecastScores {
        demand_score: round2(demand),
        competition_index: round2(competition),
        profitability_score: round2(profitability),
        market_fit_score: round2(market_fit),
        risk_score: round2(risk),
        overall_score: round2(overall),
        expected_monthly_sales_volume: sales.monthly_volume,
        expected_annual_revenue: sales.annual_revenue,
        expected_profit_margin: sales.profit_margin,
        recommended_price: pricing.recommended,
        recommended_price_min: pricing.min,
        recommended_price_max: pricing.max,
        price_elasticity: pricing.elasticity,
        city_rankings: Value::Array(rankings.iter().take(TOP_RANKINGS).cloned().collect()),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn product() -> Value {
        json!({
            "demand_analysis": {"demand_score": 70},
            "quality_assessment": {"quality_score": 80, "quality_tier": "premium"},
            "market_fit": {"market_fit_score": 75},
            "pricing_analysis": {"optimal_price_range": "$40-$60"}
        })
    }

    fn market() -> Value {
        json!({
            "overall_market_assessment": {"market_maturity": "growing", "entry_difficulty": "easy"},
            "city_rankings": [{
                "city_name": "Berlin",
                "estimated_market_size": "Large",
                "ecommerce_readiness_score": 90,
                "demographic_match_score": 60,
                "competition_score": 40,
                "purchasing_power_score": 70
            }]
        })
    }

    #[test]
    fn full_computation_matches_formulas() {
        let scores = calculate_forecast_scores(&product(), &market());

        // 70*.4 + 85*.3 + 90*.2 + 60*.1
        assert_eq!(scores.demand_score, 77.5);
        // 40 * 0.85
        assert_eq!(scores.competition_index, 34.0);
        // 70*.45 + 80*.35 + 66*.2
        assert_eq!(scores.profitability_score, 72.7);
        // 34*.5 + 25*.3 + 10*.2
        assert_eq!(scores.risk_score, 26.5);
        // .4*77.5 + .3*72.7 + .2*66 + .1*75
        assert_eq!(scores.overall_score, 73.51);
        assert_eq!(scores.market_fit_score, 75.0);

        // trunc(800 * 1.55 * 1.32)
        assert_eq!(scores.expected_monthly_sales_volume, 1636);
        assert_eq!(scores.expected_annual_revenue, 981_600.0);
        assert_eq!(scores.expected_profit_margin, 53.2);

        assert_eq!(scores.recommended_price, 65.0);
        assert_eq!(scores.recommended_price_min, 52.0);
        assert_eq!(scores.recommended_price_max, 78.0);
        assert_eq!(scores.price_elasticity, PriceElasticity::Inelastic);
        assert_eq!(scores.city_rankings.as_array().unwrap().len(), 1);
    }

    #[test]
    fn empty_inputs_use_defaults() {
        let scores = calculate_forecast_scores(&json!({}), &json!({}));

        // 50*.4 + 60*.3 + 50*.2 + 50*.1
        assert_eq!(scores.demand_score, 53.0);
        assert_eq!(scores.competition_index, 50.0);
        // 15*.3 + 30*.2 + 25
        assert_eq!(scores.risk_score, 35.5);
        assert_eq!(scores.recommended_price, 50.0);
        assert_eq!(scores.recommended_price_min, 40.0);
        assert_eq!(scores.recommended_price_max, 60.0);
        assert_eq!(scores.price_elasticity, PriceElasticity::Neutral);
        assert_eq!(scores.city_rankings, json!([]));
    }

    #[test]
    fn pricing_variants() {
        let p = recommend_pricing(&json!(100), "budget");
        assert_eq!((p.recommended, p.min, p.max), (70.0, 56.0, 84.0));
        assert_eq!(p.elasticity, PriceElasticity::Elastic);

        let p = recommend_pricing(&json!("abc-def"), "standard");
        assert_eq!((p.recommended, p.min, p.max), (50.0, 40.0, 60.0));

        let p = recommend_pricing(&json!("N/A"), "standard");
        assert_eq!((p.recommended, p.min, p.max), (50.0, 40.0, 60.0));

        let p = recommend_pricing(&Value::Null, "Premium");
        assert_eq!(p.recommended, 65.0);
        assert_eq!(p.elasticity, PriceElasticity::Inelastic);
    }

    #[test]
    fn margin_is_bounded() {
        assert_eq!(estimate_sales(50.0, "medium", 0.0).profit_margin, 60.0);
        assert_eq!(estimate_sales(50.0, "medium", 100.0).profit_margin, 40.0);
        assert_eq!(estimate_sales(50.0, "medium", 100.0).monthly_volume, 0);
    }

    #[test]
    fn city_rankings_are_capped_at_ten() {
        let rankings: Vec<Value> = (0..15).map(|i| json!({"rank": i})).collect();
        let scores =
            calculate_forecast_scores(&json!({}), &json!({"city_rankings": rankings}));
        let out = scores.city_rankings.as_array().unwrap();
        assert_eq!(out.len(), 10);
        assert_eq!(out[0]["rank"], 0);
    }

    proptest! {
        #[test]
        fn prop_scores_stay_in_range(
            product_demand in -50.0f64..200.0,
            quality in -50.0f64..200.0,
            competition in -50.0f64..200.0,
            power in -50.0f64..200.0,
            size in prop::sample::select(vec!["small", "medium", "large", "very large", "huge"]),
            maturity in prop::sample::select(vec!["emerging", "growing", "mature", "saturated", "?"]),
        ) {
            let product = json!({
                "demand_analysis": {"demand_score": product_demand},
                "quality_assessment": {"quality_score": quality},
            });
            let market = json!({
                "overall_market_assessment": {"market_maturity": maturity},
                "city_rankings": [{
                    "estimated_market_size": size,
                    "competition_score": competition,
                    "purchasing_power_score": power,
                }]
            });
            let s = calculate_forecast_scores(&product, &market);

            for v in [s.demand_score, s.competition_index, s.profitability_score, s.risk_score, s.overall_score] {
                prop_assert!((0.0..=100.0).contains(&v), "score {v} out of range");
            }
            prop_assert!((15.0..=70.0).contains(&s.expected_profit_margin));
            prop_assert!(s.expected_monthly_sales_volume >= 0);
        }

        #[test]
        fn prop_price_band_is_ordered(p in 1.0f64..10_000.0, tier in prop::sample::select(vec!["premium", "standard", "budget"])) {
            let r = recommend_pricing(&json!(p), tier);
            prop_assert!(r.min <= r.recommended && r.recommended <= r.max);
        }
    }
}

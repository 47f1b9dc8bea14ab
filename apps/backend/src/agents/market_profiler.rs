//! Market Profiler: ranks candidate cities for a product category.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::base::{require_field, Agent, AgentAnalysis, AgentConfig, AgentKind, LlmSession};
use super::error::AgentError;
use super::parsing::{at, capitalize, grouped, len_at, num_at, score_of, str_at};

/// Cities beyond this many are left out of the prompt.
pub const MAX_PROMPT_CITIES: usize = 20;

pub struct MarketProfiler;

const SYSTEM_PROMPT: &str = "You are an expert Market Analysis and Demographics AI specializing in:
- Urban economics and city demographics
- E-commerce adoption and digital behavior patterns
- Purchasing power analysis and consumer spending
- Competitive market dynamics and regional trends

Analyze cities as markets: demographic match, purchasing power, e-commerce \
readiness, competitive density, cultural fit, entry barriers, and rank them. \
Use numerical scores (0-100) for all metrics with clear reasoning. \
Respond in structured JSON format.";

impl MarketProfiler {
    pub fn format_cities(cities: &[Value]) -> String {
        cities
            .iter()
            .take(MAX_PROMPT_CITIES)
            .map(|c| {
                format!(
                    "- {}, {}: Pop {}, GDP/capita ${}, E-comm {}%, Competition {}/100",
                    str_at(c, &["name"], "Unknown"),
                    str_at(c, &["country"], "Unknown"),
                    grouped(num_at(c, &["population"], 0.0) as i64),
                    grouped(num_at(c, &["gdp_per_capita"], 0.0) as i64),
                    num_at(c, &["ecommerce_penetration"], 0.0),
                    num_at(c, &["competition_density"], 0.0),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn prompt(input: &Value, cities: &[Value]) -> String {
        let category = str_at(input, &["product_category"], "");
        let price = num_at(input, &["price_point"], 0.0);
        let demographics = input
            .get("target_demographics")
            .cloned()
            .unwrap_or_else(|| Value::Array(vec![]));

        format!(
            r#"Analyze these cities as potential markets for a {category} product priced at ${price}.

**Product Context:**
- Category: {category}
- Price Point: ${price}
- Target Demographics: {demographics}

**Cities to Analyze:**
{cities}

Provide comprehensive market analysis in JSON format:

{{
    "overall_market_assessment": {{"market_size_estimate": "string", "growth_rate": "percentage", "market_maturity": "emerging|growing|mature|saturated", "entry_difficulty": "easy|moderate|challenging"}},
    "city_rankings": [{{"city_name": "string", "country": "string", "overall_score": 0-100, "demographic_match_score": 0-100, "purchasing_power_score": 0-100, "ecommerce_readiness_score": 0-100, "competition_score": 0-100, "estimated_market_size": "string", "key_advantages": ["..."], "key_challenges": ["..."]}}],
    "demographic_insights": {{"ideal_customer_profile": "string", "age_groups": ["..."], "income_brackets": ["..."]}},
    "competitive_landscape": {{"competition_intensity": "low|moderate|high|very high", "major_competitors": ["..."], "market_gaps": ["..."]}},
    "confidence_score": 0-100,
    "analysis_summary": "string"
}}

Rank cities by overall market potential. Be realistic and data-driven."#,
            cities = Self::format_cities(cities),
        )
    }

    fn reasoning_steps(data: &Value, city_count: usize) -> Vec<String> {
        let top = &data["city_rankings"][0];
        let top_line = if top.is_object() {
            format!(
                "Top city: {} (score: {}/100)",
                str_at(top, &["city_name"], "Unknown"),
                score_of(top, &["overall_score"])
            )
        } else {
            "No cities ranked".to_string()
        };

        vec![
            format!("Analyzed {city_count} cities for market potential"),
            top_line,
            format!(
                "Market maturity: {}",
                str_at(data, &["overall_market_assessment", "market_maturity"], "unknown")
            ),
            format!(
                "Competition intensity: {}",
                str_at(data, &["competitive_landscape", "competition_intensity"], "unknown")
            ),
            format!(
                "Identified {} market gaps",
                len_at(data, &["competitive_landscape", "market_gaps"])
            ),
        ]
    }

    fn summary(data: &Value, category: &str) -> String {
        let market = at(data, &["overall_market_assessment"]);
        let mut s = format!(
            "**Market Analysis Summary for {category}**\n\n\
             **Market Overview:**\n\
             - Size: {}\n\
             - Growth Rate: {}\n\
             - Maturity: {}\n\n\
             **Top 3 Cities:**",
            str_at(market, &["market_size_estimate"], "N/A"),
            str_at(market, &["growth_rate"], "N/A"),
            capitalize(&str_at(market, &["market_maturity"], "N/A")),
        );

        let rankings = data["city_rankings"].as_array().cloned().unwrap_or_default();
        for (i, city) in rankings.iter().take(3).enumerate() {
            s.push_str(&format!(
                "\n{}. **{}, {}** (Score: {}/100)\n   - Market Size: {}\n   - Key Advantage: {}",
                i + 1,
                str_at(city, &["city_name"], "Unknown"),
                str_at(city, &["country"], "Unknown"),
                score_of(city, &["overall_score"]),
                str_at(city, &["estimated_market_size"], "N/A"),
                city["key_advantages"][0].as_str().unwrap_or("N/A"),
            ));
        }

        s.push_str(&format!(
            "\n\n**Competition:** {}\n**Market Gaps:** {} opportunities identified",
            capitalize(&str_at(data, &["competitive_landscape", "competition_intensity"], "unknown")),
            len_at(data, &["competitive_landscape", "market_gaps"]),
        ));
        s
    }
}

#[async_trait]
impl Agent for MarketProfiler {
    fn kind(&self) -> AgentKind {
        AgentKind::MarketProfiler
    }

    fn config(&self) -> AgentConfig {
        AgentConfig {
            temperature: 0.6,
            max_tokens: 3500,
            default_confidence: 70.0,
        }
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    fn validate(&self, input: &Value) -> Result<(), AgentError> {
        require_field(input, "product_category")?;
        match input.get("cities").and_then(Value::as_array) {
            Some(cities) if !cities.is_empty() => Ok(()),
            _ => Err(AgentError::InvalidInput(
                "No cities provided for analysis".to_string(),
            )),
        }
    }

    async fn process(&self, input: &Value, llm: &LlmSession<'_>) -> Result<AgentAnalysis, AgentError> {
        let cities = input["cities"].as_array().cloned().unwrap_or_default();
        let category = str_at(input, &["product_category"], "");
        info!(cities = cities.len(), category = %category, "market_analysis=start");

        let data = llm.call_json(&Self::prompt(input, &cities)).await?;

        Ok(AgentAnalysis {
            reasoning_steps: Self::reasoning_steps(&data, cities.len()),
            summary: Self::summary(&data, &category),
            confidence_score: num_at(&data, &["confidence_score"], self.config().default_confidence),
            data,
        })
    }
}

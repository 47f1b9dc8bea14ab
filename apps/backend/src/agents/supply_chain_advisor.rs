//! Supply Chain Advisor: manufacturing, suppliers, COGS and logistics.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::base::{require_field, Agent, AgentAnalysis, AgentConfig, AgentKind, LlmSession};
use super::error::AgentError;
use super::parsing::{bullets, len_at, num_at, str_at, strings_at};

pub struct SupplyChainAdvisor;

const SYSTEM_PROMPT: &str = "You are an expert Supply Chain and Manufacturing AI specializing in:
- FASON (contract manufacturing), in-house production and dropshipping
- Supplier sourcing and evaluation across regions
- Cost of goods analysis and cost optimization
- Production timelines, logistics, warehousing and quality control

Produce practical, cost-aware supply chain plans with supplier options, \
per-unit cost breakdowns, lead times and quality checkpoints. \
Respond in structured JSON format.";

impl SupplyChainAdvisor {
    fn prompt(input: &Value) -> String {
        format!(
            r#"Design a supply chain strategy for this product:

**Product:**
- Name: {name}
- Category: {category}
- Specifications: {specs}

**Requirements:**
- Target Volume: {volume} units/month
- Quality Requirements: {quality}
- Target Unit Cost: ${cost:.2}
- Target Market: {market}

Provide the strategy in JSON format:

{{
    "manufacturing_recommendations": {{"primary_method": "fason|in-house|dropshipping|hybrid", "rationale": "string"}},
    "supplier_recommendations": [{{"region": "string", "unit_cost_range": "min-max", "lead_time_days": 0, "moq": 0, "pros": ["..."], "cons": ["..."]}}],
    "cost_analysis": {{"per_unit_breakdown": {{"materials": 0, "labor": 0, "packaging": 0, "shipping": 0, "total_cogs": 0}}, "cost_optimization_opportunities": ["..."]}},
    "production_timeline": {{"sampling": 0, "production": 0, "shipping": 0, "total_lead_time": 0}},
    "logistics_strategy": {{"warehousing": {{"strategy": "string"}}, "fulfillment": "string"}},
    "quality_control": {{"quality_checkpoints": ["..."]}},
    "recommendations": ["..."],
    "confidence_score": 0-100
}}"#,
            name = str_at(input, &["product_name"], "Unknown"),
            category = str_at(input, &["product_category"], ""),
            specs = input.get("specifications").cloned().unwrap_or(Value::Null),
            volume = num_at(input, &["target_volume"], 1000.0),
            quality = str_at(input, &["quality_requirements"], "standard"),
            cost = num_at(input, &["target_cost"], 0.0),
            market = str_at(input, &["target_market"], "Global"),
        )
    }

    fn cogs(data: &Value) -> f64 {
        num_at(data, &["cost_analysis", "per_unit_breakdown", "total_cogs"], 0.0)
    }

    fn reasoning_steps(data: &Value) -> Vec<String> {
        vec![
            format!(
                "Recommended manufacturing method: {}",
                str_at(data, &["manufacturing_recommendations", "primary_method"], "N/A")
            ),
            format!(
                "Identified {} potential suppliers",
                len_at(data, &["supplier_recommendations"])
            ),
            format!("Estimated COGS: ${:.2} per unit", Self::cogs(data)),
            format!(
                "Total lead time: {} days",
                str_at(data, &["production_timeline", "total_lead_time"], "N/A")
            ),
            format!(
                "Found {} cost optimization opportunities",
                len_at(data, &["cost_analysis", "cost_optimization_opportunities"])
            ),
        ]
    }

    fn summary(data: &Value, product: &str) -> String {
        let mut s = format!(
            "**Supply Chain Strategy for {product}**\n\n\
             **Manufacturing Method:** {}\n\
             **Cost of Goods Sold:** ${:.2} per unit\n\
             **Total Lead Time:** {} days\n\n\
             **Top Supplier Recommendations:**",
            str_at(data, &["manufacturing_recommendations", "primary_method"], "N/A").to_uppercase(),
            Self::cogs(data),
            str_at(data, &["production_timeline", "total_lead_time"], "N/A"),
        );

        for (i, supplier) in data["supplier_recommendations"]
            .as_array()
            .into_iter()
            .flatten()
            .take(3)
            .enumerate()
        {
            s.push_str(&format!(
                "\n{}. {} - ${} per unit, {} days lead time",
                i + 1,
                str_at(supplier, &["region"], "Unknown"),
                str_at(supplier, &["unit_cost_range"], "N/A"),
                str_at(supplier, &["lead_time_days"], "N/A"),
            ));
        }

        s.push_str(&format!(
            "\n\n**Logistics Strategy:** {}\n**Quality Control:** {} checkpoints defined\n\n**Key Recommendations:**\n{}",
            str_at(data, &["logistics_strategy", "warehousing", "strategy"], "N/A"),
            len_at(data, &["quality_control", "quality_checkpoints"]),
            bullets(&strings_at(data, &["recommendations"], 3)),
        ));
        s
    }
}

#[async_trait]
impl Agent for SupplyChainAdvisor {
    fn kind(&self) -> AgentKind {
        AgentKind::SupplyChainAdvisor
    }

    fn config(&self) -> AgentConfig {
        AgentConfig {
            temperature: 0.6,
            max_tokens: 3500,
            default_confidence: 75.0,
        }
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    fn validate(&self, input: &Value) -> Result<(), AgentError> {
        require_field(input, "product_name")
    }

    async fn process(&self, input: &Value, llm: &LlmSession<'_>) -> Result<AgentAnalysis, AgentError> {
        let product = str_at(input, &["product_name"], "Unknown");
        info!(product = %product, "supply_chain_plan=start");

        let data = llm.call_json(&Self::prompt(input)).await?;

        Ok(AgentAnalysis {
            reasoning_steps: Self::reasoning_steps(&data),
            summary: Self::summary(&data, &product),
            confidence_score: num_at(&data, &["confidence_score"], self.config().default_confidence),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn steps_and_summary_read_nested_fields() {
        let data = json!({
            "manufacturing_recommendations": {"primary_method": "fason"},
            "supplier_recommendations": [
                {"region": "Turkey", "unit_cost_range": "4-6", "lead_time_days": 21},
                {"region": "Vietnam", "unit_cost_range": "3-5", "lead_time_days": 35}
            ],
            "cost_analysis": {"per_unit_breakdown": {"total_cogs": 5.126}, "cost_optimization_opportunities": ["bulk film"]},
            "production_timeline": {"total_lead_time": 45},
            "logistics_strategy": {"warehousing": {"strategy": "3PL near port"}},
            "quality_control": {"quality_checkpoints": ["inline", "final"]}
        });

        let steps = SupplyChainAdvisor::reasoning_steps(&data);
        assert_eq!(steps[1], "Identified 2 potential suppliers");
        assert_eq!(steps[2], "Estimated COGS: $5.13 per unit");
        assert_eq!(steps[3], "Total lead time: 45 days");

        let s = SupplyChainAdvisor::summary(&data, "Tote");
        assert!(s.contains("**Manufacturing Method:** FASON"));
        assert!(s.contains("1. Turkey - $4-6 per unit, 21 days lead time"));
        assert!(s.contains("**Quality Control:** 2 checkpoints defined"));
    }
}

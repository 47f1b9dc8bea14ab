//! Advertising Planner: platform mix, ad copy, budget split and KPI targets.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::base::{require_field, Agent, AgentAnalysis, AgentConfig, AgentKind, LlmSession};
use super::error::AgentError;
use super::parsing::{at, bullets, len_at, money, num_at, str_at, strings_at};

pub struct AdvertisingPlanner;

const SYSTEM_PROMPT: &str = "You are an expert Digital Advertising Strategist AI specializing in:
- Meta (Facebook/Instagram), Google Ads and TikTok campaign planning
- Audience targeting and ad creative copywriting
- Budget allocation across platforms and ROAS optimization

Build performance-focused campaign plans with platform recommendations, \
ad copy variations, budget allocation and realistic KPI targets. \
Respond in structured JSON format.";

impl AdvertisingPlanner {
    fn prompt(input: &Value) -> String {
        format!(
            r#"Create a complete advertising strategy for this product:

**Product:**
- Name: {name}
- Category: {category}
- Price: ${price}

**Market:**
- Target City: {city}
- Target Demographics: {demographics}
- Monthly Budget Range: ${min} - ${max}
- Campaign Objective: {objective}

Provide the strategy in JSON format:

{{
    "platform_recommendations": [{{"platform": "string", "priority": "high|medium|low", "rationale": "string"}}],
    "meta_ads_strategy": {{"campaign_structure": "string", "targeting": {{}}, "ad_copy_variations": [{{"headline": "string", "primary_text": "string", "cta": "string"}}]}},
    "google_ads_strategy": {{"campaign_types": ["..."], "keywords": ["..."], "ad_copy_variations": [{{"headline": "string", "description": "string"}}]}},
    "budget_allocation": {{"total_monthly_budget": 0, "meta_budget": 0, "google_budget": 0, "tiktok_budget": 0, "allocation_rationale": "string"}},
    "kpi_targets": {{"target_roas": 0, "target_cpa": 0, "target_monthly_sales": 0, "target_revenue": 0}},
    "recommendations": ["..."],
    "confidence_score": 0-100
}}"#,
            name = str_at(input, &["product_name"], "Unknown"),
            category = str_at(input, &["product_category"], ""),
            price = num_at(input, &["price"], 0.0),
            city = str_at(input, &["target_city"], "N/A"),
            demographics = input.get("target_demographics").cloned().unwrap_or(Value::Null),
            min = num_at(input, &["budget_range", "min"], 1000.0),
            max = num_at(input, &["budget_range", "max"], 5000.0),
            objective = str_at(input, &["campaign_objective"], "conversion"),
        )
    }

    fn reasoning_steps(data: &Value) -> Vec<String> {
        let platforms: Vec<String> = data["platform_recommendations"]
            .as_array()
            .map(|recs| {
                recs.iter()
                    .map(|r| str_at(r, &["platform"], "unknown"))
                    .collect()
            })
            .unwrap_or_default();

        vec![
            format!("Recommended platforms: {}", platforms.join(", ")),
            format!(
                "Generated {} Meta ad variations",
                len_at(data, &["meta_ads_strategy", "ad_copy_variations"])
            ),
            format!(
                "Created {} Google ad variations",
                len_at(data, &["google_ads_strategy", "ad_copy_variations"])
            ),
            format!(
                "Budget allocation: {}",
                str_at(data, &["budget_allocation", "allocation_rationale"], "N/A")
            ),
            format!(
                "Expected ROAS: {}",
                str_at(data, &["kpi_targets", "target_roas"], "N/A")
            ),
        ]
    }

    fn summary(data: &Value, product_name: &str) -> String {
        let budget = at(data, &["budget_allocation"]);
        let kpis = at(data, &["kpi_targets"]);

        let mut s = format!(
            "**Advertising Strategy for {product_name}**\n\n\
             **Budget Allocation:**\n\
             - Total Monthly: ${}\n\
             - Meta Ads: ${}\n\
             - Google Ads: ${}\n\
             - TikTok Ads: ${}\n\n\
             **Expected Performance:**\n\
             - Target ROAS: {}x\n\
             - Target CPA: ${}\n\
             - Monthly Sales Target: {} units\n\
             - Expected Revenue: ${}\n\n\
             **Platform Priorities:**",
            money(num_at(budget, &["total_monthly_budget"], 0.0)),
            money(num_at(budget, &["meta_budget"], 0.0)),
            money(num_at(budget, &["google_budget"], 0.0)),
            money(num_at(budget, &["tiktok_budget"], 0.0)),
            num_at(kpis, &["target_roas"], 0.0),
            num_at(kpis, &["target_cpa"], 0.0),
            num_at(kpis, &["target_monthly_sales"], 0.0),
            money(num_at(kpis, &["target_revenue"], 0.0)),
        );

        for rec in data["platform_recommendations"]
            .as_array()
            .into_iter()
            .flatten()
            .take(3)
        {
            s.push_str(&format!(
                "\n- {}: {} priority - {}",
                str_at(rec, &["platform"], "unknown"),
                str_at(rec, &["priority"], "n/a").to_uppercase(),
                str_at(rec, &["rationale"], ""),
            ));
        }

        s.push_str("\n\n**Key Recommendations:**\n");
        s.push_str(&bullets(&strings_at(data, &["recommendations"], 3)));
        s
    }
}

#[async_trait]
impl Agent for AdvertisingPlanner {
    fn kind(&self) -> AgentKind {
        AgentKind::AdvertisingPlanner
    }

    fn config(&self) -> AgentConfig {
        AgentConfig {
            temperature: 0.8,
            max_tokens: 4000,
            default_confidence: 80.0,
        }
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    fn validate(&self, input: &Value) -> Result<(), AgentError> {
        require_field(input, "product_name")?;
        require_field(input, "product_category")?;
        require_field(input, "price")
    }

    async fn process(&self, input: &Value, llm: &LlmSession<'_>) -> Result<AgentAnalysis, AgentError> {
        let product_name = str_at(input, &["product_name"], "Unknown");
        info!(product = %product_name, "advertising_plan=start");

        let data = llm.call_json(&Self::prompt(input)).await?;

        Ok(AgentAnalysis {
            reasoning_steps: Self::reasoning_steps(&data),
            summary: Self::summary(&data, &product_name),
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
    fn requires_price() {
        let err = AdvertisingPlanner
            .validate(&json!({"product_name": "Mug", "product_category": "home_garden"}))
            .unwrap_err();
        assert!(matches!(err, AgentError::MissingField("price")));
    }

    #[test]
    fn summary_formats_budget_and_platforms() {
        let data = json!({
            "platform_recommendations": [
                {"platform": "Meta", "priority": "high", "rationale": "visual product"},
                {"platform": "Google", "priority": "medium", "rationale": "search intent"}
            ],
            "budget_allocation": {"total_monthly_budget": 3000, "meta_budget": 1800.5, "google_budget": 1199.5, "tiktok_budget": 0},
            "kpi_targets": {"target_roas": 3.5, "target_cpa": 12, "target_monthly_sales": 250, "target_revenue": 12500},
            "recommendations": ["Test UGC creatives"]
        });

        let s = AdvertisingPlanner::summary(&data, "Mug");
        assert!(s.contains("- Total Monthly: $3,000.00"));
        assert!(s.contains("- Meta Ads: $1,800.50"));
        assert!(s.contains("- Target ROAS: 3.5x"));
        assert!(s.contains("- Meta: HIGH priority - visual product"));
        assert!(s.ends_with("• Test UGC creatives"));

        let steps = AdvertisingPlanner::reasoning_steps(&data);
        assert_eq!(steps[0], "Recommended platforms: Meta, Google");
        assert_eq!(steps[4], "Expected ROAS: 3.5");
    }
}

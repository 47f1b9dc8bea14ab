//! Sales Strategy Agent: marketplaces, funnel, email sequences and upsells.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::base::{require_field, Agent, AgentAnalysis, AgentConfig, AgentKind, LlmSession};
use super::error::AgentError;
use super::parsing::{at, bullets, len_at, num_at, str_at, strings_at};

pub struct SalesStrategy;

const SYSTEM_PROMPT: &str = "You are an expert E-commerce Sales Strategist AI specializing in:
- Marketplace selection and multi-channel selling
- Sales funnel design and conversion optimization
- Email marketing automation and retention
- Upsell, cross-sell and pricing psychology

Design sales strategies with marketplace priorities, funnel structure, \
email sequences, upsell offers and benchmark KPIs. \
Respond in structured JSON format.";

impl SalesStrategy {
    fn prompt(input: &Value) -> String {
        format!(
            r#"Build a sales strategy for this product:

**Product:**
- Name: {name}
- Category: {category}
- Price: ${price}
- Unique Selling Points: {usps}

**Market:**
- Target Audience: {audience}
- Competition Level: {competition}

Provide the strategy in JSON format:

{{
    "marketplace_recommendations": [{{"platform": "string", "priority": "primary|secondary|tertiary", "rationale": "string"}}],
    "sales_funnel": {{"funnel_type": "string", "stages": ["..."]}},
    "email_marketing_sequences": {{"welcome_series": [{{"subject": "string"}}], "abandoned_cart_series": [{{"subject": "string"}}], "post_purchase_series": [{{"subject": "string"}}]}},
    "upsell_downsell_strategy": {{"upsells": ["..."], "cross_sells": ["..."], "downsells": ["..."]}},
    "metrics_and_kpis": {{"conversion_funnel_benchmarks": {{"overall_conversion": "percentage", "average_order_value": 0, "customer_lifetime_value": 0}}}},
    "recommendations": ["..."],
    "confidence_score": 0-100
}}"#,
            name = str_at(input, &["product_name"], "Unknown"),
            category = str_at(input, &["product_category"], ""),
            price = num_at(input, &["price"], 0.0),
            usps = input.get("unique_selling_points").cloned().unwrap_or(Value::Null),
            audience = input.get("target_audience").cloned().unwrap_or(Value::Null),
            competition = str_at(input, &["competition_level"], "moderate"),
        )
    }

    fn primary_marketplace(data: &Value) -> String {
        data["marketplace_recommendations"]
            .as_array()
            .and_then(|m| {
                m.iter()
                    .find(|r| r["priority"].as_str() == Some("primary"))
            })
            .map_or_else(|| "N/A".to_string(), |r| str_at(r, &["platform"], "N/A"))
    }

    fn reasoning_steps(data: &Value) -> Vec<String> {
        vec![
            format!("Primary marketplace: {}", Self::primary_marketplace(data)),
            format!(
                "Funnel type: {}",
                str_at(data, &["sales_funnel", "funnel_type"], "N/A")
            ),
            format!(
                "Created {} welcome emails",
                len_at(data, &["email_marketing_sequences", "welcome_series"])
            ),
            format!(
                "Identified {} upsell opportunities",
                len_at(data, &["upsell_downsell_strategy", "upsells"])
            ),
            format!(
                "Target conversion rate: {}",
                str_at(
                    data,
                    &["metrics_and_kpis", "conversion_funnel_benchmarks", "overall_conversion"],
                    "N/A"
                )
            ),
        ]
    }

    fn title_case(s: &str) -> String {
        s.split('_')
            .map(super::parsing::capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn summary(data: &Value, product: &str) -> String {
        let benchmarks = at(data, &["metrics_and_kpis", "conversion_funnel_benchmarks"]);
        let emails = at(data, &["email_marketing_sequences"]);
        let upsell = at(data, &["upsell_downsell_strategy"]);

        format!(
            "**Sales Strategy for {product}**\n\n\
             **Primary Marketplace:** {}\n\
             **Funnel Type:** {}\n\n\
             **Expected Performance:**\n\
             - Overall Conversion Rate: {}\n\
             - Average Order Value: ${}\n\
             - Customer Lifetime Value: ${}\n\n\
             **Email Sequences:**\n\
             - Welcome Series: {} emails\n\
             - Abandoned Cart: {} emails\n\
             - Post-Purchase: {} emails\n\n\
             **Upsell Strategy:**\n\
             - {} upsell offers identified\n\
             - {} cross-sell opportunities\n\n\
             **Top Recommendations:**\n{}",
            Self::primary_marketplace(data),
            Self::title_case(&str_at(data, &["sales_funnel", "funnel_type"], "N/A")),
            str_at(benchmarks, &["overall_conversion"], "N/A"),
            num_at(benchmarks, &["average_order_value"], 0.0),
            num_at(benchmarks, &["customer_lifetime_value"], 0.0),
            len_at(emails, &["welcome_series"]),
            len_at(emails, &["abandoned_cart_series"]),
            len_at(emails, &["post_purchase_series"]),
            len_at(upsell, &["upsells"]),
            len_at(upsell, &["cross_sells"]),
            bullets(&strings_at(data, &["recommendations"], 3)),
        )
    }
}

#[async_trait]
impl Agent for SalesStrategy {
    fn kind(&self) -> AgentKind {
        AgentKind::SalesStrategy
    }

    fn config(&self) -> AgentConfig {
        AgentConfig {
            temperature: 0.7,
            max_tokens: 4000,
            default_confidence: 80.0,
        }
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    fn validate(&self, input: &Value) -> Result<(), AgentError> {
        require_field(input, "product_name")?;
        require_field(input, "price")
    }

    async fn process(&self, input: &Value, llm: &LlmSession<'_>) -> Result<AgentAnalysis, AgentError> {
        let product = str_at(input, &["product_name"], "Unknown");
        info!(product = %product, "sales_strategy=start");

        let data = llm.call_json(&Self::prompt(input)).await?;

        Ok(AgentAnalysis {
            reasoning_steps: Self::reasoning_steps(&data),
            summary: Self::summary(&data, &product),
            confidence_score: num_at(&data, &["confidence_score"], self.config().default_confidence),
            data,
        })
    }
}

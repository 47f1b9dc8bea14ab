//! Product Analyst: classification, quality, demand and market fit.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::base::{require_field, Agent, AgentAnalysis, AgentConfig, AgentKind, LlmSession};
use super::error::AgentError;
use super::parsing::{bullets, capitalize, len_at, num_at, score_of, str_at, strings_at};

pub struct ProductAnalyst;

const SYSTEM_PROMPT: &str = "You are an expert Product Analyst AI with deep knowledge of:
- E-commerce product categorization and market dynamics
- Quality assessment and manufacturing processes
- FASON (contract manufacturing) production methods
- Consumer demand patterns and product-market fit
- Competitive product positioning

Analyze products and provide insights about classification, quality tier \
(Premium, Standard, Budget), production method, demand potential (0-100), \
market fit, unique selling propositions and target customer segments.

Always give clear reasoning, numerical scores with explanations, actionable \
insights and risk factors. Respond in JSON format with structured data.";

impl ProductAnalyst {
    fn prompt(input: &Value) -> String {
        let specs = input
            .get("specifications")
            .filter(|v| !v.is_null())
            .map_or_else(|| "{}".to_string(), Value::to_string);

        format!(
            r#"Analyze this product comprehensively:

**Product Information:**
- Name: {name}
- Description: {description}
- Category: {category}
- Base Price: ${price}
- Production Method: {method}
- Specifications: {specs}

Provide a detailed analysis in JSON format with this exact structure:

{{
    "product_classification": {{"primary_category": "string", "sub_category": "string", "product_type": "string", "market_segment": "premium|mid-tier|budget"}},
    "quality_assessment": {{"quality_tier": "premium|standard|budget", "quality_score": 0-100, "quality_indicators": ["..."], "perceived_value": "high|medium|low"}},
    "demand_analysis": {{"demand_score": 0-100, "demand_trend": "rising|stable|declining", "target_demographics": ["..."], "demand_drivers": ["..."]}},
    "production_analysis": {{"production_complexity": "simple|moderate|complex", "recommended_method": "in-house|fason|dropshipping|hybrid", "estimated_production_cost_range": "min-max USD", "lead_time_estimate": "X-Y days"}},
    "market_fit": {{"market_fit_score": 0-100, "competitive_intensity": "low|medium|high", "unique_selling_points": ["..."], "positioning_strategy": "string"}},
    "pricing_analysis": {{"price_positioning": "premium|competitive|value", "price_elasticity": "elastic|neutral|inelastic", "optimal_price_range": "min-max USD", "profit_margin_potential": "percentage range"}},
    "risk_factors": [{{"risk": "string", "severity": "high|medium|low", "mitigation": "string"}}],
    "opportunities": ["..."],
    "recommendations": ["..."],
    "confidence_score": 0-100,
    "reasoning": "detailed explanation"
}}

Be thorough, analytical, and data-driven in your assessment."#,
            name = str_at(input, &["product_name"], "Unknown"),
            description = str_at(input, &["description"], ""),
            category = str_at(input, &["category"], ""),
            price = num_at(input, &["base_price"], 0.0),
            method = str_at(input, &["production_method"], "Not specified"),
        )
    }

    fn reasoning_steps(data: &Value) -> Vec<String> {
        vec![
            format!(
                "Classified product as {}",
                str_at(data, &["product_classification", "primary_category"], "unknown")
            ),
            format!(
                "Quality assessed as {} tier",
                str_at(data, &["quality_assessment", "quality_tier"], "unknown")
            ),
            format!(
                "Demand score calculated: {}/100",
                score_of(data, &["demand_analysis", "demand_score"])
            ),
            format!(
                "Production method recommended: {}",
                str_at(data, &["production_analysis", "recommended_method"], "unknown")
            ),
            format!(
                "Market fit score: {}/100",
                score_of(data, &["market_fit", "market_fit_score"])
            ),
        ]
    }

    fn summary(data: &Value, product_name: &str) -> String {
        let quality = str_at(data, &["quality_assessment", "quality_tier"], "unknown");
        let demand = num_at(data, &["demand_analysis", "demand_score"], 0.0);
        let fit = num_at(data, &["market_fit", "market_fit_score"], 0.0);
        let production = str_at(data, &["production_analysis", "recommended_method"], "unknown");

        let demand_label = if demand >= 70.0 {
            "High"
        } else if demand >= 40.0 {
            "Moderate"
        } else {
            "Low"
        };
        let fit_label = if fit >= 80.0 {
            "Excellent"
        } else if fit >= 60.0 {
            "Good"
        } else {
            "Fair"
        };

        format!(
            "**Product Analysis Summary: {product_name}**\n\n\
             **Quality:** {} tier product\n\
             **Demand Potential:** {}/100 - {demand_label} demand expected\n\
             **Market Fit:** {}/100 - {fit_label} product-market alignment\n\
             **Production:** {} recommended for optimal efficiency\n\n\
             **Key Insights:**\n{}\n\n\
             **Opportunities:** {} market opportunities identified\n\
             **Risks:** {} risk factors to address",
            capitalize(&quality),
            score_of(data, &["demand_analysis", "demand_score"]),
            score_of(data, &["market_fit", "market_fit_score"]),
            production.to_uppercase(),
            bullets(&strings_at(data, &["recommendations"], 3)),
            len_at(data, &["opportunities"]),
            len_at(data, &["risk_factors"]),
        )
    }
}

#[async_trait]
impl Agent for ProductAnalyst {
    fn kind(&self) -> AgentKind {
        AgentKind::ProductAnalyst
    }

    fn config(&self) -> AgentConfig {
        AgentConfig {
            temperature: 0.7,
            max_tokens: 3000,
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
        let product_name = str_at(input, &["product_name"], "Unknown");
        info!(product = %product_name, "product_analysis=start");

        let data = llm.call_json(&Self::prompt(input)).await?;

        Ok(AgentAnalysis {
            reasoning_steps: Self::reasoning_steps(&data),
            summary: Self::summary(&data, &product_name),
            confidence_score: num_at(&data, &["confidence_score"], self.config().default_confidence),
            data,
        })
    }
}

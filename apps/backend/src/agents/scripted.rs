//! Deterministic `LlmClient` with canned per-agent replies.
//!
//! Serves as the fallback when no OpenAI key is configured and as the
//! test double for the forecast pipeline.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::error::AgentError;
use super::llm::{LlmClient, LlmRequest, LlmResponse, Role};
use super::AgentKind;

pub const SCRIPTED_MODEL: &str = "scripted-v1";

#[derive(Debug, Clone)]
enum Script {
    Reply(String),
    Fail { status: u16, message: String },
}

#[derive(Default)]
pub struct ScriptedLlm {
    scripts: Mutex<HashMap<AgentKind, Script>>,
    calls: Mutex<Vec<AgentKind>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `content` verbatim for `agent`.
    pub fn with_reply(self, agent: AgentKind, content: impl Into<String>) -> Self {
        self.set(agent, Script::Reply(content.into()));
        self
    }

    /// Fail every call from `agent` with an API error of `status`.
    pub fn failing(self, agent: AgentKind, status: u16, message: impl Into<String>) -> Self {
        self.set(
            agent,
            Script::Fail {
                status,
                message: message.into(),
            },
        );
        self
    }

    fn set(&self, agent: AgentKind, script: Script) {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(agent, script);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn calls_for(&self, agent: AgentKind) -> usize {
        self.calls
            .lock()
            .map(|c| c.iter().filter(|k| **k == agent).count())
            .unwrap_or(0)
    }

    fn script_for(&self, agent: AgentKind) -> Option<Script> {
        self.scripts.lock().ok().and_then(|s| s.get(&agent).cloned())
    }
}

fn user_prompt(req: &LlmRequest) -> &str {
    req.messages
        .iter()
        .find(|m| m.role == Role::User)
        .map_or("", |m| m.content.as_str())
}

/// `(name, country)` pairs from the market profiler's city lines.
fn prompt_cities(prompt: &str) -> Vec<(String, String)> {
    prompt
        .lines()
        .filter_map(|line| line.strip_prefix("- "))
        .filter(|line| line.contains(": Pop "))
        .filter_map(|line| line.split_once(':'))
        .map(|(place, _)| match place.rsplit_once(", ") {
            Some((name, country)) => (name.to_string(), country.to_string()),
            None => (place.to_string(), String::new()),
        })
        .collect()
}

fn product_analysis() -> Value {
    json!({
        "product_classification": {
            "primary_category": "consumer goods",
            "sub_category": "lifestyle",
            "product_type": "physical",
            "market_segment": "mid-tier"
        },
        "quality_assessment": {"quality_tier": "standard", "quality_score": 72, "perceived_value": "medium"},
        "demand_analysis": {
            "demand_score": 68,
            "demand_trend": "rising",
            "target_demographics": ["urban professionals 25-40", "online-first shoppers"]
        },
        "production_analysis": {"production_complexity": "moderate", "recommended_method": "fason", "lead_time_estimate": "20-30 days"},
        "market_fit": {"market_fit_score": 74, "competitive_intensity": "medium", "unique_selling_points": ["durable build", "clean design"]},
        "pricing_analysis": {"price_positioning": "competitive", "price_elasticity": "neutral", "optimal_price_range": "$40-$60"},
        "risk_factors": [{"risk": "copycat products", "severity": "medium", "mitigation": "build brand early"}],
        "opportunities": ["bundle offers", "corporate gifting"],
        "recommendations": ["Launch with a focused hero SKU", "Collect reviews in the first 30 days", "Test two price points"],
        "confidence_score": 78
    })
}

fn market_analysis(cities: &[(String, String)]) -> Value {
    let rankings: Vec<Value> = cities
        .iter()
        .enumerate()
        .map(|(i, (name, country))| {
            let step = i as f64 * 4.0;
            json!({
                "city_name": name,
                "country": country,
                "overall_score": (88.0 - step).max(20.0),
                "demographic_match_score": (80.0 - step).max(20.0),
                "purchasing_power_score": (76.0 - step).max(20.0),
                "ecommerce_readiness_score": (82.0 - step).max(20.0),
                "competition_score": 55.0,
                "estimated_market_size": if i == 0 { "large" } else { "medium" },
                "key_advantages": ["high online spend"],
                "key_challenges": ["crowded ad auctions"]
            })
        })
        .collect();

    json!({
        "overall_market_assessment": {
            "market_size_estimate": "$200M-500M",
            "growth_rate": "9%",
            "market_maturity": "growing",
            "entry_difficulty": "moderate"
        },
        "city_rankings": rankings,
        "demographic_insights": {
            "ideal_customer_profile": "Digitally active 25-40 year olds with disposable income",
            "age_groups": ["25-34", "35-44"],
            "income_brackets": ["middle", "upper-middle"]
        },
        "competitive_landscape": {
            "competition_intensity": "moderate",
            "major_competitors": ["regional brands"],
            "market_gaps": ["premium-feel at mid price", "faster delivery"]
        },
        "confidence_score": 72
    })
}

fn advertising_plan() -> Value {
    json!({
        "platform_recommendations": [
            {"platform": "Meta", "priority": "high", "rationale": "strong visual discovery"},
            {"platform": "Google", "priority": "medium", "rationale": "captures search intent"}
        ],
        "meta_ads_strategy": {"ad_copy_variations": [
            {"headline": "Built for every day", "primary_text": "Made to last.", "cta": "Shop Now"},
            {"headline": "Your new favourite", "primary_text": "Loved by early buyers.", "cta": "Learn More"}
        ]},
        "google_ads_strategy": {"ad_copy_variations": [{"headline": "Buy direct", "description": "Free shipping over $50"}]},
        "budget_allocation": {"total_monthly_budget": 3000, "meta_budget": 1800, "google_budget": 1200, "tiktok_budget": 0,
                              "allocation_rationale": "60/40 Meta-Google split"},
        "kpi_targets": {"target_roas": 3.2, "target_cpa": 14, "target_monthly_sales": 220, "target_revenue": 11000},
        "recommendations": ["Refresh creatives every two weeks"],
        "confidence_score": 80
    })
}

fn supply_chain_plan() -> Value {
    json!({
        "manufacturing_recommendations": {"primary_method": "fason", "rationale": "low capex"},
        "supplier_recommendations": [
            {"region": "Turkey", "unit_cost_range": "9-12", "lead_time_days": 21},
            {"region": "Vietnam", "unit_cost_range": "7-10", "lead_time_days": 35}
        ],
        "cost_analysis": {"per_unit_breakdown": {"total_cogs": 11.5}, "cost_optimization_opportunities": ["consolidate packaging"]},
        "production_timeline": {"total_lead_time": 42},
        "logistics_strategy": {"warehousing": {"strategy": "single 3PL hub"}},
        "quality_control": {"quality_checkpoints": ["pre-production sample", "final inspection"]},
        "recommendations": ["Order a paid sample before committing MOQ"],
        "confidence_score": 76
    })
}

fn sales_plan() -> Value {
    json!({
        "marketplace_recommendations": [
            {"platform": "Own storefront", "priority": "primary", "rationale": "margin control"},
            {"platform": "Amazon", "priority": "secondary", "rationale": "reach"}
        ],
        "sales_funnel": {"funnel_type": "lead_magnet_funnel"},
        "email_marketing_sequences": {
            "welcome_series": [{"subject": "Welcome"}, {"subject": "Our story"}, {"subject": "10% off"}],
            "abandoned_cart_series": [{"subject": "Forgot something?"}],
            "post_purchase_series": [{"subject": "Thanks!"}, {"subject": "How is it going?"}]
        },
        "upsell_downsell_strategy": {"upsells": ["care kit"], "cross_sells": ["gift wrap", "refill pack"]},
        "metrics_and_kpis": {"conversion_funnel_benchmarks": {"overall_conversion": "2.5%", "average_order_value": 58, "customer_lifetime_value": 140}},
        "recommendations": ["Offer free shipping threshold above AOV"],
        "confidence_score": 79
    })
}

fn canned(agent: AgentKind, prompt: &str) -> Value {
    match agent {
        AgentKind::ProductAnalyst => product_analysis(),
        AgentKind::MarketProfiler => market_analysis(&prompt_cities(prompt)),
        AgentKind::AdvertisingPlanner => advertising_plan(),
        AgentKind::SupplyChainAdvisor => supply_chain_plan(),
        AgentKind::SalesStrategy => sales_plan(),
    }
}

/// Roughly four characters per token.
fn approx_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(4)
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(req.agent);
        }

        let content = match self.script_for(req.agent) {
            Some(Script::Reply(content)) => content,
            Some(Script::Fail { status, message }) => {
                return Err(AgentError::Api { status, message })
            }
            None => canned(req.agent, user_prompt(&req)).to_string(),
        };

        let prompt_tokens = req.messages.iter().map(|m| approx_tokens(&m.content)).sum();
        Ok(LlmResponse {
            completion_tokens: approx_tokens(&content),
            content,
            model: SCRIPTED_MODEL.to_string(),
            prompt_tokens,
        })
    }

    fn model_id(&self) -> &str {
        SCRIPTED_MODEL
    }
}

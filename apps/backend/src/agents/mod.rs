//! LLM-backed analysis agents.
//!
//! - `base`: `Agent` trait, `AgentRuntime` policy and the `execute` wrapper
//! - `llm`: `LlmClient` abstraction, with `OpenAiClient` and `ScriptedLlm`
//! - one module per agent, discoverable through `registry`

mod advertising_planner;
pub mod base;
pub mod error;
pub mod llm;
mod market_profiler;
pub mod openai;
pub mod parsing;
mod product_analyst;
pub mod registry;
mod sales_strategy;
pub mod scripted;
mod supply_chain_advisor;

use std::sync::Arc;

pub use advertising_planner::AdvertisingPlanner;
pub use base::{execute, Agent, AgentAnalysis, AgentConfig, AgentKind, AgentOutput, AgentRuntime};
pub use error::AgentError;
pub use llm::{LlmClient, LlmRequest, LlmResponse};
pub use market_profiler::MarketProfiler;
pub use openai::OpenAiClient;
pub use product_analyst::ProductAnalyst;
pub use sales_strategy::SalesStrategy;
pub use scripted::ScriptedLlm;
pub use supply_chain_advisor::SupplyChainAdvisor;
use tracing::warn;

use crate::config::Settings;

/// OpenAI when a key is configured, otherwise the scripted client.
pub fn llm_from_settings(settings: &Settings) -> Arc<dyn LlmClient> {
    match &settings.openai_api_key {
        Some(key) => Arc::new(OpenAiClient::new(
            settings.openai_base_url.clone(),
            key.clone(),
            settings.openai_model.clone(),
        )),
        None => {
            warn!("OPENAI_API_KEY not set; agents use scripted responses");
            Arc::new(ScriptedLlm::new())
        }
    }
}

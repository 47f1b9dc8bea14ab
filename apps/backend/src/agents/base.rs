//! Agent trait and the shared execute wrapper.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use super::error::AgentError;
use super::llm::{ChatMessage, LlmClient, LlmRequest};
use super::parsing::parse_json_response;

pub const JSON_ONLY_INSTRUCTION: &str = "Respond ONLY with valid JSON. No markdown, no explanations.";

/// USD per million tokens.
const PROMPT_PRICE_PER_M: f64 = 10.0;
const COMPLETION_PRICE_PER_M: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    ProductAnalyst,
    MarketProfiler,
    AdvertisingPlanner,
    SupplyChainAdvisor,
    SalesStrategy,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::ProductAnalyst,
        AgentKind::MarketProfiler,
        AgentKind::AdvertisingPlanner,
        AgentKind::SupplyChainAdvisor,
        AgentKind::SalesStrategy,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            AgentKind::ProductAnalyst => "product_analyst",
            AgentKind::MarketProfiler => "market_profiler",
            AgentKind::AdvertisingPlanner => "advertising_planner",
            AgentKind::SupplyChainAdvisor => "supply_chain_advisor",
            AgentKind::SalesStrategy => "sales_strategy",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            AgentKind::ProductAnalyst => "Product Analyst",
            AgentKind::MarketProfiler => "Market Profiler",
            AgentKind::AdvertisingPlanner => "Advertising Planner",
            AgentKind::SupplyChainAdvisor => "Supply Chain Advisor",
            AgentKind::SalesStrategy => "Sales Strategy Agent",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AgentError::InvalidInput(format!("unknown agent kind '{s}'")))
    }
}

/// Sampling parameters for one agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub default_confidence: f64,
}

/// What `Agent::process` produces on success.
#[derive(Debug, Clone)]
pub struct AgentAnalysis {
    pub data: Value,
    pub summary: String,
    pub reasoning_steps: Vec<String>,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentOutput {
    pub agent_kind: AgentKind,
    pub agent_name: String,
    pub success: bool,
    pub data: Value,
    pub summary: String,
    pub reasoning_steps: Vec<String>,
    pub confidence_score: f64,
    pub execution_time_ms: u64,
    pub tokens_used: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub cost_usd: f64,
    pub model_name: String,
    pub retry_count: u32,
    pub error: Option<String>,
}

impl AgentOutput {
    /// Data when successful, otherwise an empty object.
    pub fn data_or_empty(&self) -> Value {
        if self.success {
            self.data.clone()
        } else {
            Value::Object(Default::default())
        }
    }

    pub fn summary_or_empty(&self) -> &str {
        if self.success {
            &self.summary
        } else {
            ""
        }
    }
}

pub fn calculate_cost(prompt_tokens: u64, completion_tokens: u64) -> f64 {
    let cost = (prompt_tokens as f64 / 1_000_000.0) * PROMPT_PRICE_PER_M
        + (completion_tokens as f64 / 1_000_000.0) * COMPLETION_PRICE_PER_M;
    (cost * 1_000_000.0).round() / 1_000_000.0
}

/// Shared LLM access policy: which client, model, timeout and attempts.
#[derive(Clone)]
pub struct AgentRuntime {
    pub llm: Arc<dyn LlmClient>,
    pub model: String,
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, timeout: Duration, max_attempts: u32) -> Self {
        Self {
            llm,
            model: model.into(),
            timeout,
            max_attempts: max_attempts.max(1),
        }
    }
}

/// One agent run's view of the LLM. Accumulates token usage across calls.
pub struct LlmSession<'a> {
    runtime: &'a AgentRuntime,
    kind: AgentKind,
    system_prompt: &'static str,
    config: AgentConfig,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    retries: AtomicU32,
}

impl<'a> LlmSession<'a> {
    pub fn new(runtime: &'a AgentRuntime, agent: &dyn Agent) -> Self {
        Self {
            runtime,
            kind: agent.kind(),
            system_prompt: agent.system_prompt(),
            config: agent.config(),
            prompt_tokens: AtomicU64::new(0),
            completion_tokens: AtomicU64::new(0),
            retries: AtomicU32::new(0),
        }
    }

    fn messages(&self, user_prompt: &str, json: bool) -> Vec<ChatMessage> {
        let mut messages = vec![
            ChatMessage::system(self.system_prompt),
            ChatMessage::user(user_prompt),
        ];
        if json {
            messages.push(ChatMessage::user(JSON_ONLY_INSTRUCTION));
        }
        messages
    }

    /// Raw completion text, retrying transient failures within the timeout budget.
    pub async fn call(&self, user_prompt: &str, json: bool) -> Result<String, AgentError> {
        let req = LlmRequest {
            agent: self.kind,
            model: self.runtime.model.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            messages: self.messages(user_prompt, json),
        };

        let mut attempt = 1;
        loop {
            let outcome = tokio::time::timeout(self.runtime.timeout, self.runtime.llm.complete(req.clone()))
                .await
                .unwrap_or_else(|_| Err(AgentError::Timeout(self.runtime.timeout.as_secs())));

            match outcome {
                Ok(resp) => {
                    self.prompt_tokens.fetch_add(resp.prompt_tokens, Ordering::Relaxed);
                    self.completion_tokens
                        .fetch_add(resp.completion_tokens, Ordering::Relaxed);
                    return Ok(resp.content);
                }
                Err(e) if e.is_transient() && attempt < self.runtime.max_attempts => {
                    warn!(agent = %self.kind, attempt, error = %e, "llm_call=retry");
                    self.retries.fetch_add(1, Ordering::Relaxed);
                    tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn call_json(&self, user_prompt: &str) -> Result<Value, AgentError> {
        let text = self.call(user_prompt, true).await?;
        parse_json_response(&text)
    }

    pub fn usage(&self) -> (u64, u64) {
        (
            self.prompt_tokens.load(Ordering::Relaxed),
            self.completion_tokens.load(Ordering::Relaxed),
        )
    }

    pub fn retries(&self) -> u32 {
        self.retries.load(Ordering::Relaxed)
    }
}

#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    fn config(&self) -> AgentConfig;

    fn system_prompt(&self) -> &'static str;

    /// Reject inputs missing required fields before any LLM call is made.
    fn validate(&self, input: &Value) -> Result<(), AgentError>;

    async fn process(&self, input: &Value, llm: &LlmSession<'_>) -> Result<AgentAnalysis, AgentError>;
}

/// Require `field` to be present and non-empty.
pub fn require_field(input: &Value, field: &'static str) -> Result<(), AgentError> {
    match input.get(field) {
        None | Some(Value::Null) => Err(AgentError::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(AgentError::MissingField(field)),
        Some(_) => Ok(()),
    }
}

/// Run `agent` on `input`. Never fails outward: errors become an
/// unsuccessful [`AgentOutput`].
pub async fn execute(agent: &dyn Agent, input: &Value, runtime: &AgentRuntime) -> AgentOutput {
    let started = Instant::now();
    let session = LlmSession::new(runtime, agent);
    info!(agent = %agent.kind(), "agent=start");

    let result = match agent.validate(input) {
        Ok(()) => agent.process(input, &session).await,
        Err(e) => Err(e),
    };

    let execution_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let (prompt_tokens, completion_tokens) = session.usage();
    let cost_usd = calculate_cost(prompt_tokens, completion_tokens);

    let base = AgentOutput {
        agent_kind: agent.kind(),
        agent_name: agent.name().to_string(),
        success: false,
        data: Value::Object(Default::default()),
        summary: String::new(),
        reasoning_steps: Vec::new(),
        confidence_score: 0.0,
        execution_time_ms,
        tokens_used: prompt_tokens + completion_tokens,
        prompt_tokens,
        completion_tokens,
        cost_usd,
        model_name: runtime.model.clone(),
        retry_count: session.retries(),
        error: None,
    };

    match result {
        Ok(analysis) => {
            info!(
                agent = %agent.kind(),
                execution_time_ms,
                tokens = base.tokens_used,
                cost_usd,
                "agent=completed"
            );
            AgentOutput {
                success: true,
                data: analysis.data,
                summary: analysis.summary,
                reasoning_steps: analysis.reasoning_steps,
                confidence_score: analysis.confidence_score.clamp(0.0, 100.0),
                ..base
            }
        }
        Err(e) => {
            error!(agent = %agent.kind(), execution_time_ms, error = %e, "agent=failed");
            AgentOutput {
                summary: format!("Agent execution failed: {e}"),
                error: Some(e.to_string()),
                ..base
            }
        }
    }
}

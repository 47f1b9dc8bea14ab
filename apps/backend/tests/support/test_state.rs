use std::sync::Arc;

use commerce_intel::agents::{LlmClient, ScriptedLlm};
use commerce_intel::config::Settings;
use commerce_intel::infra::state::build_state;
use commerce_intel::state::app_state::AppState;

/// Fresh in-memory database with the canned LLM.
pub async fn test_state() -> AppState {
    test_state_with_llm(Arc::new(ScriptedLlm::new())).await
}

pub async fn test_state_with_llm(llm: Arc<dyn LlmClient>) -> AppState {
    test_state_with(Settings::for_tests(), llm).await
}

pub async fn test_state_with(settings: Settings, llm: Arc<dyn LlmClient>) -> AppState {
    build_state(settings)
        .with_db()
        .with_llm(llm)
        .build()
        .await
        .expect("build test state")
}

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::sync::Semaphore;

use super::security_config::SecurityConfig;
use crate::agents::{AgentRuntime, LlmClient};
use crate::config::Settings;

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// Absent only in tests that never touch the database
    pub db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub settings: Arc<Settings>,
    pub llm: Arc<dyn LlmClient>,
    /// Bounds concurrently running agents across all requests
    pub agent_permits: Arc<Semaphore>,
}

impl AppState {
    pub fn new(
        db: Option<DatabaseConnection>,
        settings: Settings,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            db,
            security: SecurityConfig::from_settings(&settings),
            agent_permits: Arc::new(Semaphore::new(settings.agent_concurrent_limit.max(1))),
            settings: Arc::new(settings),
            llm,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn agent_runtime(&self) -> AgentRuntime {
        AgentRuntime::new(
            self.llm.clone(),
            self.llm.model_id().to_string(),
            Duration::from_secs(self.settings.agent_timeout_seconds),
            self.settings.agent_max_retries,
        )
    }
}

use std::sync::Arc;

use db_infra::bootstrap_db;

use crate::agents::{llm_from_settings, LlmClient};
use crate::config::Settings;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Builder for `AppState`, shared by `main` and the tests.
pub struct StateBuilder {
    settings: Settings,
    with_db: bool,
    llm: Option<Arc<dyn LlmClient>>,
}

impl StateBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            with_db: false,
            llm: None,
        }
    }

    /// Connect (and migrate) using the settings' `db_env` / `db_kind`.
    pub fn with_db(mut self) -> Self {
        self.with_db = true;
        self
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let db = if self.with_db {
            Some(bootstrap_db(self.settings.db_env, self.settings.db_kind).await?)
        } else {
            None
        };
        let llm = self
            .llm
            .unwrap_or_else(|| llm_from_settings(&self.settings));

        Ok(AppState::new(db, self.settings, llm))
    }
}

pub fn build_state(settings: Settings) -> StateBuilder {
    StateBuilder::new(settings)
}

use thiserror::Error;

use crate::error::AppError;
use crate::errors::ErrorCode;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid JSON response from LLM: {0}")]
    InvalidResponse(String),
    #[error("LLM call timed out after {0}s")]
    Timeout(u64),
    #[error("LLM transport error: {0}")]
    Transport(String),
    #[error("LLM API error [{status}]: {message}")]
    Api { status: u16, message: String },
}

impl AgentError {
    /// Failures worth another attempt: timeouts, transport, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            AgentError::Timeout(_) | AgentError::Transport(_) => true,
            AgentError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        AgentError::Transport(e.to_string())
    }
}

impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::MissingField(_) | AgentError::InvalidInput(_) => {
                AppError::invalid(ErrorCode::ValidationError, err.to_string())
            }
            AgentError::Timeout(_) | AgentError::Transport(_) => {
                AppError::upstream(ErrorCode::UpstreamUnavailable, err.to_string())
            }
            AgentError::InvalidResponse(_) | AgentError::Api { .. } => {
                AppError::upstream(ErrorCode::AgentFailed, err.to_string())
            }
        }
    }
}

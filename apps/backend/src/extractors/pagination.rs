//! `skip`/`limit` query parameters shared by list endpoints.

use actix_web::error::QueryPayloadError;
use actix_web::{web, HttpRequest};
use serde::Deserialize;

use crate::adapters::Page;
use crate::error::AppError;
use crate::errors::ErrorCode;

pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl PageParams {
    /// Validated window; `limit` must be 1..=100 when given.
    pub fn page(&self, default_limit: u64) -> Result<Page, AppError> {
        let limit = self.limit.unwrap_or(default_limit);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                format!("limit must be between 1 and {MAX_LIMIT}"),
            ));
        }
        Ok(Page::new(self.skip.unwrap_or(0), limit))
    }
}

/// Query string failures render as ProblemDetails like every other error.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        AppError::invalid(
            ErrorCode::ValidationError,
            format!("Invalid query string: {err}"),
        )
        .into()
    })
}

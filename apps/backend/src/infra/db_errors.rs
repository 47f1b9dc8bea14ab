//! SeaORM -> DomainError translation.
//!
//! Adapters return `sea_orm::DbErr`; repos convert here, and handlers map
//! `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

const SQLITE_UNIQUE: &str = "UNIQUE constraint failed: ";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// `table.column` from a SQLite unique violation message.
fn sqlite_unique_target(error_msg: &str) -> Option<&str> {
    let start = error_msg.find(SQLITE_UNIQUE)? + SQLITE_UNIQUE.len();
    error_msg[start..].split_whitespace().next()
}

fn conflict_for_target(target: &str) -> Option<(ConflictKind, &'static str)> {
    match target.trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_') {
        "users.email" | "users_email_key" => {
            Some((ConflictKind::UniqueEmail, "Email already registered"))
        }
        "subscriptions.user_id" | "subscriptions_user_id_key" => Some((
            ConflictKind::Other("UniqueSubscription".into()),
            "User already has a subscription",
        )),
        "api_keys.key_hash" | "api_keys_key_hash_key" => Some((
            ConflictKind::Other("UniqueApiKey".into()),
            "API key collision; retry",
        )),
        _ => None,
    }
}

fn postgres_unique_target(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    [
        "users_email_key",
        "subscriptions_user_id_key",
        "api_keys_key_hash_key",
    ]
    .into_iter()
    .find(|name| error_msg.contains(name))
    .and_then(conflict_for_target)
}

/// Translate a `DbErr` into a `DomainError` with PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains(SQLITE_UNIQUE)
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        let known = sqlite_unique_target(&error_msg)
            .and_then(conflict_for_target)
            .or_else(|| postgres_unique_target(&error_msg));
        if let Some((kind, detail)) = known {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23514") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Check constraint violation");
        return DomainError::validation_other("Check constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("pool timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

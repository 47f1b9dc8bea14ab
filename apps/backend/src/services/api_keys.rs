//! API key issuance and validation.
//!
//! Raw keys look like `ci_<43 url-safe chars>` and are shown once. Only the
//! blake3 hex digest and the first eight characters are persisted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::error::AppError;
use crate::errors::domain::{DomainError, UnauthorizedKind};
use crate::repos::api_keys::{self, ApiKey, ApiKeyCreate};

pub const KEY_PREFIX: &str = "ci_";
pub const STORED_PREFIX_LEN: usize = 8;
const KEY_BYTES: usize = 32;
const MAX_EXPIRY_DAYS: u32 = 3650;

/// Returned once, at creation.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedKey {
    pub id: i64,
    pub name: String,
    pub prefix: String,
    pub key: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

pub fn generate_raw_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!("{KEY_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes))
}

pub fn hash_key(raw: &str) -> String {
    blake3::hash(raw.as_bytes()).to_hex().to_string()
}

pub async fn issue<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    name: &str,
    expires_in_days: Option<u32>,
) -> Result<IssuedKey, AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(DomainError::validation_other("name must be 1 to 100 characters").into());
    }
    let expires_at = match expires_in_days {
        None => None,
        Some(days) if (1..=MAX_EXPIRY_DAYS).contains(&days) => {
            Some(OffsetDateTime::now_utc() + Duration::days(i64::from(days)))
        }
        Some(_) => {
            return Err(DomainError::validation_other(format!(
                "expires_in_days must be between 1 and {MAX_EXPIRY_DAYS}"
            ))
            .into())
        }
    };

    let raw = generate_raw_key();
    let prefix: String = raw.chars().take(STORED_PREFIX_LEN).collect();
    let key = api_keys::create_key(
        conn,
        ApiKeyCreate {
            user_id,
            key_hash: hash_key(&raw),
            name: name.to_string(),
            prefix: prefix.clone(),
            expires_at,
        },
    )
    .await?;

    info!(user_id, key_id = key.id, prefix = %prefix, "api key issued");
    Ok(IssuedKey {
        id: key.id,
        name: key.name,
        prefix,
        key: raw,
        expires_at: key.expires_at,
    })
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<ApiKey>, AppError> {
    Ok(api_keys::list_for_user(conn, user_id).await?)
}

pub async fn revoke<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    key_id: i64,
) -> Result<(), AppError> {
    api_keys::revoke_owned(conn, user_id, key_id).await?;
    info!(user_id, key_id, "api key revoked");
    Ok(())
}

/// Resolve a raw key to its record and count the use.
pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    raw: &str,
) -> Result<ApiKey, AppError> {
    let invalid =
        || DomainError::unauthorized(UnauthorizedKind::InvalidApiKey, "Invalid or expired API key");

    if !raw.starts_with(KEY_PREFIX) {
        return Err(invalid().into());
    }
    let key = api_keys::find_by_hash(conn, &hash_key(raw))
        .await?
        .ok_or_else(invalid)?;
    if !key.is_valid(OffsetDateTime::now_utc()) {
        warn!(key_id = key.id, "rejected inactive api key");
        return Err(invalid().into());
    }

    api_keys::record_usage(conn, key.id).await?;
    Ok(key)
}

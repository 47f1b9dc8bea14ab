//! API key repository functions and the key domain model.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::api_keys_sea as api_keys_adapter;
use crate::entities::api_keys;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use api_keys_adapter::ApiKeyCreate;

/// API key without its hash; safe to return to the owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiKey {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub name: String,
    pub prefix: String,
    pub is_active: bool,
    pub is_revoked: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_used_at: Option<OffsetDateTime>,
    pub usage_count: i64,
    pub rate_limit_per_minute: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ApiKey {
    /// Active, not revoked, and not past its expiry.
    pub fn is_valid(&self, now: OffsetDateTime) -> bool {
        self.is_active && !self.is_revoked && self.expires_at.map_or(true, |exp| exp > now)
    }
}

pub async fn create_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ApiKeyCreate,
) -> Result<ApiKey, DomainError> {
    let key = api_keys_adapter::create_key(conn, dto).await?;
    Ok(ApiKey::from(key))
}

pub async fn find_by_hash<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key_hash: &str,
) -> Result<Option<ApiKey>, DomainError> {
    let key = api_keys_adapter::find_by_hash(conn, key_hash).await?;
    Ok(key.map(ApiKey::from))
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<ApiKey>, DomainError> {
    let rows = api_keys_adapter::list_for_user(conn, user_id).await?;
    Ok(rows.into_iter().map(ApiKey::from).collect())
}

pub async fn revoke_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    key_id: i64,
) -> Result<(), DomainError> {
    match api_keys_adapter::revoke_owned(conn, user_id, key_id).await? {
        0 => Err(DomainError::not_found(
            NotFoundKind::ApiKey,
            format!("API key {key_id} not found"),
        )),
        _ => Ok(()),
    }
}

pub async fn record_usage<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key_id: i64,
) -> Result<(), DomainError> {
    api_keys_adapter::record_usage(conn, key_id).await?;
    Ok(())
}

impl From<api_keys::Model> for ApiKey {
    fn from(model: api_keys::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            prefix: model.prefix,
            is_active: model.is_active,
            is_revoked: model.is_revoked,
            last_used_at: model.last_used_at,
            usage_count: model.usage_count,
            rate_limit_per_minute: model.rate_limit_per_minute,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}

//! SeaORM adapter for the api_keys table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::api_keys;

pub const DEFAULT_RATE_LIMIT_PER_MINUTE: i32 = 60;

#[derive(Debug, Clone)]
pub struct ApiKeyCreate {
    pub user_id: i64,
    pub key_hash: String,
    pub name: String,
    pub prefix: String,
    pub expires_at: Option<OffsetDateTime>,
}

pub async fn create_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ApiKeyCreate,
) -> Result<api_keys::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    api_keys::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        key_hash: Set(dto.key_hash),
        name: Set(dto.name),
        prefix: Set(dto.prefix),
        is_active: Set(true),
        is_revoked: Set(false),
        last_used_at: Set(None),
        usage_count: Set(0),
        rate_limit_per_minute: Set(DEFAULT_RATE_LIMIT_PER_MINUTE),
        expires_at: Set(dto.expires_at),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn find_by_hash<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key_hash: &str,
) -> Result<Option<api_keys::Model>, sea_orm::DbErr> {
    api_keys::Entity::find()
        .filter(api_keys::Column::KeyHash.eq(key_hash))
        .one(conn)
        .await
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<api_keys::Model>, sea_orm::DbErr> {
    api_keys::Entity::find()
        .filter(api_keys::Column::UserId.eq(user_id))
        .order_by_desc(api_keys::Column::CreatedAt)
        .order_by_desc(api_keys::Column::Id)
        .all(conn)
        .await
}

/// Returns the number of keys revoked (0 when not owned).
pub async fn revoke_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    key_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = api_keys::Entity::update_many()
        .col_expr(api_keys::Column::IsRevoked, Expr::value(true))
        .col_expr(api_keys::Column::IsActive, Expr::value(false))
        .col_expr(
            api_keys::Column::UpdatedAt,
            Expr::value(OffsetDateTime::now_utc()),
        )
        .filter(api_keys::Column::Id.eq(key_id))
        .filter(api_keys::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn record_usage<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    api_keys::Entity::update_many()
        .col_expr(
            api_keys::Column::UsageCount,
            Expr::col(api_keys::Column::UsageCount).add(1),
        )
        .col_expr(api_keys::Column::LastUsedAt, Expr::value(Some(now)))
        .col_expr(api_keys::Column::UpdatedAt, Expr::value(now))
        .filter(api_keys::Column::Id.eq(key_id))
        .exec(conn)
        .await?;
    Ok(())
}

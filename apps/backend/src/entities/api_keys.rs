use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "user_id")]
    pub user_id: i64,
    /// blake3 hex digest of the raw key; the raw key is never stored
    #[sea_orm(column_name = "key_hash", unique)]
    #[serde(skip_serializing)]
    pub key_hash: String,
    pub name: String,
    pub prefix: String,
    #[sea_orm(column_name = "is_active")]
    pub is_active: bool,
    #[sea_orm(column_name = "is_revoked")]
    pub is_revoked: bool,
    #[sea_orm(column_name = "last_used_at")]
    pub last_used_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "usage_count")]
    pub usage_count: i64,
    #[sea_orm(column_name = "rate_limit_per_minute")]
    pub rate_limit_per_minute: i32,
    #[sea_orm(column_name = "expires_at")]
    pub expires_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    #[sea_orm(string_value = "basic")]
    Basic,
    #[sea_orm(string_value = "pro")]
    Pro,
    #[sea_orm(string_value = "master")]
    Master,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "past_due")]
    PastDue,
    #[sea_orm(string_value = "trialing")]
    Trialing,
    #[sea_orm(string_value = "incomplete")]
    Incomplete,
    #[sea_orm(string_value = "incomplete_expired")]
    IncompleteExpired,
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "user_id", unique)]
    pub user_id: i64,
    #[sea_orm(column_name = "plan_type")]
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    #[sea_orm(column_name = "current_period_start")]
    pub current_period_start: OffsetDateTime,
    #[sea_orm(column_name = "current_period_end")]
    pub current_period_end: Option<OffsetDateTime>,
    #[sea_orm(column_name = "cancel_at_period_end")]
    pub cancel_at_period_end: bool,
    #[sea_orm(column_name = "cancelled_at")]
    pub cancelled_at: Option<OffsetDateTime>,
    /// `None` means unlimited
    #[sea_orm(column_name = "forecasts_limit")]
    pub forecasts_limit: Option<i32>,
    #[sea_orm(column_name = "forecasts_used")]
    pub forecasts_used: i32,
    #[sea_orm(column_name = "cities_limit")]
    pub cities_limit: i32,
    #[sea_orm(column_name = "api_calls_limit")]
    pub api_calls_limit: Option<i32>,
    #[sea_orm(column_name = "api_calls_used")]
    pub api_calls_used: i32,
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

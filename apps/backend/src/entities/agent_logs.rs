use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum AgentRunStatus {
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// One agent execution within a forecast run.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agent_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "forecast_id")]
    pub forecast_id: i64,
    #[sea_orm(column_name = "agent_kind")]
    pub agent_kind: String,
    #[sea_orm(column_name = "agent_name")]
    pub agent_name: String,
    pub status: AgentRunStatus,
    #[sea_orm(column_name = "is_successful")]
    pub is_successful: bool,
    #[sea_orm(column_name = "error_message", column_type = "Text", nullable)]
    pub error_message: Option<String>,
    #[sea_orm(column_name = "started_at")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[sea_orm(column_name = "completed_at")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "execution_time_ms")]
    pub execution_time_ms: i64,
    #[sea_orm(column_name = "input_data", column_type = "Json", nullable)]
    pub input_data: Option<Json>,
    #[sea_orm(column_name = "output_data", column_type = "Json", nullable)]
    pub output_data: Option<Json>,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    #[sea_orm(column_name = "model_name")]
    pub model_name: Option<String>,
    #[sea_orm(column_name = "tokens_used")]
    pub tokens_used: i64,
    #[sea_orm(column_name = "prompt_tokens")]
    pub prompt_tokens: i64,
    #[sea_orm(column_name = "completion_tokens")]
    pub completion_tokens: i64,
    #[sea_orm(column_name = "cost_usd", column_type = "Double")]
    pub cost_usd: f64,
    #[sea_orm(column_name = "reasoning_steps", column_type = "Json", nullable)]
    pub reasoning_steps: Option<Json>,
    #[sea_orm(column_name = "confidence_score", column_type = "Double")]
    pub confidence_score: f64,
    #[sea_orm(column_name = "retry_count")]
    pub retry_count: i32,
    #[sea_orm(column_name = "created_at")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forecasts::Entity",
        from = "Column::ForecastId",
        to = "super::forecasts::Column::Id"
    )]
    Forecast,
}

impl Related<super::forecasts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forecast.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

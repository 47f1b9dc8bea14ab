//! SeaORM adapter for the agent_logs table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use serde_json::Value;
use time::OffsetDateTime;

use crate::entities::agent_logs::{self, AgentRunStatus};

#[derive(Debug, Clone)]
pub struct AgentLogCreate {
    pub forecast_id: i64,
    pub agent_kind: String,
    pub agent_name: String,
    pub is_successful: bool,
    pub error_message: Option<String>,
    pub started_at: OffsetDateTime,
    pub completed_at: OffsetDateTime,
    pub execution_time_ms: i64,
    pub input_data: Value,
    pub output_data: Value,
    pub summary: String,
    pub model_name: Option<String>,
    pub tokens_used: i64,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub cost_usd: f64,
    pub reasoning_steps: Vec<String>,
    pub confidence_score: f64,
    pub retry_count: i32,
}

pub async fn create_log<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AgentLogCreate,
) -> Result<agent_logs::Model, sea_orm::DbErr> {
    let status = if dto.is_successful {
        AgentRunStatus::Completed
    } else {
        AgentRunStatus::Failed
    };

    agent_logs::ActiveModel {
        id: NotSet,
        forecast_id: Set(dto.forecast_id),
        agent_kind: Set(dto.agent_kind),
        agent_name: Set(dto.agent_name),
        status: Set(status),
        is_successful: Set(dto.is_successful),
        error_message: Set(dto.error_message),
        started_at: Set(dto.started_at),
        completed_at: Set(Some(dto.completed_at)),
        execution_time_ms: Set(dto.execution_time_ms),
        input_data: Set(Some(dto.input_data)),
        output_data: Set(Some(dto.output_data)),
        summary: Set(Some(dto.summary)),
        model_name: Set(dto.model_name),
        tokens_used: Set(dto.tokens_used),
        prompt_tokens: Set(dto.prompt_tokens),
        completion_tokens: Set(dto.completion_tokens),
        cost_usd: Set(dto.cost_usd),
        reasoning_steps: Set(Some(Value::from(dto.reasoning_steps))),
        confidence_score: Set(dto.confidence_score),
        retry_count: Set(dto.retry_count),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

/// In execution order.
pub async fn list_for_forecast<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    forecast_id: i64,
) -> Result<Vec<agent_logs::Model>, sea_orm::DbErr> {
    agent_logs::Entity::find()
        .filter(agent_logs::Column::ForecastId.eq(forecast_id))
        .order_by_asc(agent_logs::Column::Id)
        .all(conn)
        .await
}

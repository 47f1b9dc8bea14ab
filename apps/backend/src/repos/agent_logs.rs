use sea_orm::ConnectionTrait;

use crate::adapters::agent_logs_sea as agent_logs_adapter;
use crate::errors::domain::DomainError;

pub use crate::entities::agent_logs::Model as AgentLog;
pub use agent_logs_adapter::AgentLogCreate;

pub async fn create_log<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AgentLogCreate,
) -> Result<AgentLog, DomainError> {
    Ok(agent_logs_adapter::create_log(conn, dto).await?)
}

pub async fn list_for_forecast<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    forecast_id: i64,
) -> Result<Vec<AgentLog>, DomainError> {
    Ok(agent_logs_adapter::list_for_forecast(conn, forecast_id).await?)
}

use sea_orm::ConnectionTrait;

use crate::adapters::deep_reports_sea as deep_reports_adapter;
use crate::errors::domain::DomainError;

pub use crate::entities::deep_reports::{Model as DeepReport, ReportType};
pub use deep_reports_adapter::DeepReportCreate;

pub async fn create_report<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: DeepReportCreate,
) -> Result<DeepReport, DomainError> {
    Ok(deep_reports_adapter::create_report(conn, dto).await?)
}

pub async fn list_for_forecast<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    forecast_id: i64,
) -> Result<Vec<DeepReport>, DomainError> {
    Ok(deep_reports_adapter::list_for_forecast(conn, user_id, forecast_id).await?)
}

//! SeaORM adapter for the deep_reports table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use serde_json::Value;
use time::OffsetDateTime;

use crate::entities::deep_reports::{self, ReportType};

#[derive(Debug, Clone)]
pub struct DeepReportCreate {
    pub user_id: i64,
    pub forecast_id: i64,
    pub payment_id: Option<i64>,
    pub report_type: ReportType,
    pub price_paid: f64,
    pub currency: String,
    pub report_data: Value,
    pub executive_summary: Option<String>,
}

pub async fn create_report<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: DeepReportCreate,
) -> Result<deep_reports::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    deep_reports::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        forecast_id: Set(dto.forecast_id),
        payment_id: Set(dto.payment_id),
        report_type: Set(dto.report_type),
        price_paid: Set(dto.price_paid),
        currency: Set(dto.currency),
        report_data: Set(dto.report_data),
        executive_summary: Set(dto.executive_summary),
        download_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn list_for_forecast<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    forecast_id: i64,
) -> Result<Vec<deep_reports::Model>, sea_orm::DbErr> {
    deep_reports::Entity::find()
        .filter(deep_reports::Column::ForecastId.eq(forecast_id))
        .filter(deep_reports::Column::UserId.eq(user_id))
        .order_by_desc(deep_reports::Column::Id)
        .all(conn)
        .await
}

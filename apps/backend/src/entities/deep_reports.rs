use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[sea_orm(string_value = "standard")]
    Standard,
    #[sea_orm(string_value = "premium")]
    Premium,
    #[sea_orm(string_value = "enterprise")]
    Enterprise,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deep_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "user_id")]
    pub user_id: i64,
    #[sea_orm(column_name = "forecast_id")]
    pub forecast_id: i64,
    #[sea_orm(column_name = "payment_id")]
    pub payment_id: Option<i64>,
    #[sea_orm(column_name = "report_type")]
    pub report_type: ReportType,
    /// Major units, unlike `payments.amount`
    #[sea_orm(column_name = "price_paid", column_type = "Double")]
    pub price_paid: f64,
    pub currency: String,
    #[sea_orm(column_name = "report_data", column_type = "Json")]
    pub report_data: Json,
    #[sea_orm(column_name = "executive_summary", column_type = "Text", nullable)]
    pub executive_summary: Option<String>,
    #[sea_orm(column_name = "download_count")]
    pub download_count: i32,
    #[sea_orm(column_name = "created_at")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
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

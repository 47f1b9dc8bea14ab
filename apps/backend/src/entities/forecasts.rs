use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "forecasts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "user_id")]
    pub user_id: i64,
    #[sea_orm(column_name = "product_id")]
    pub product_id: i64,
    #[sea_orm(column_name = "target_city_id")]
    pub target_city_id: Option<i64>,
    pub status: ForecastStatus,
    #[sea_orm(column_name = "error_message", column_type = "Text", nullable)]
    pub error_message: Option<String>,
    #[sea_orm(column_name = "processing_started_at")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub processing_started_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "processing_completed_at")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub processing_completed_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "processing_duration_seconds", column_type = "Double", nullable)]
    pub processing_duration_seconds: Option<f64>,

    #[sea_orm(column_name = "demand_score", column_type = "Double", nullable)]
    pub demand_score: Option<f64>,
    #[sea_orm(column_name = "competition_index", column_type = "Double", nullable)]
    pub competition_index: Option<f64>,
    #[sea_orm(column_name = "profitability_score", column_type = "Double", nullable)]
    pub profitability_score: Option<f64>,
    #[sea_orm(column_name = "market_fit_score", column_type = "Double", nullable)]
    pub market_fit_score: Option<f64>,
    #[sea_orm(column_name = "risk_score", column_type = "Double", nullable)]
    pub risk_score: Option<f64>,
    #[sea_orm(column_name = "overall_score", column_type = "Double", nullable)]
    pub overall_score: Option<f64>,

    #[sea_orm(column_name = "expected_monthly_sales_volume")]
    pub expected_monthly_sales_volume: Option<i64>,
    #[sea_orm(column_name = "expected_annual_revenue", column_type = "Double", nullable)]
    pub expected_annual_revenue: Option<f64>,
    #[sea_orm(column_name = "expected_profit_margin", column_type = "Double", nullable)]
    pub expected_profit_margin: Option<f64>,
    #[sea_orm(column_name = "recommended_price", column_type = "Double", nullable)]
    pub recommended_price: Option<f64>,
    #[sea_orm(column_name = "recommended_price_min", column_type = "Double", nullable)]
    pub recommended_price_min: Option<f64>,
    #[sea_orm(column_name = "recommended_price_max", column_type = "Double", nullable)]
    pub recommended_price_max: Option<f64>,
    #[sea_orm(column_name = "price_elasticity")]
    pub price_elasticity: Option<String>,
    #[sea_orm(column_name = "city_rankings", column_type = "Json", nullable)]
    pub city_rankings: Option<Json>,

    #[sea_orm(column_name = "product_analysis_summary", column_type = "Text", nullable)]
    pub product_analysis_summary: Option<String>,
    #[sea_orm(column_name = "market_analysis_summary", column_type = "Text", nullable)]
    pub market_analysis_summary: Option<String>,
    #[sea_orm(column_name = "advertising_strategy_summary", column_type = "Text", nullable)]
    pub advertising_strategy_summary: Option<String>,
    #[sea_orm(column_name = "supply_chain_summary", column_type = "Text", nullable)]
    pub supply_chain_summary: Option<String>,
    #[sea_orm(column_name = "sales_strategy_summary", column_type = "Text", nullable)]
    pub sales_strategy_summary: Option<String>,

    #[sea_orm(column_name = "product_analysis_data", column_type = "Json", nullable)]
    pub product_analysis_data: Option<Json>,
    #[sea_orm(column_name = "market_analysis_data", column_type = "Json", nullable)]
    pub market_analysis_data: Option<Json>,
    #[sea_orm(column_name = "advertising_strategy_data", column_type = "Json", nullable)]
    pub advertising_strategy_data: Option<Json>,
    #[sea_orm(column_name = "supply_chain_data", column_type = "Json", nullable)]
    pub supply_chain_data: Option<Json>,
    #[sea_orm(column_name = "sales_strategy_data", column_type = "Json", nullable)]
    pub sales_strategy_data: Option<Json>,

    #[sea_orm(column_name = "model_version")]
    pub model_version: Option<String>,
    #[sea_orm(column_name = "tokens_used")]
    pub tokens_used: Option<i64>,
    #[sea_orm(column_name = "cost_usd", column_type = "Double", nullable)]
    pub cost_usd: Option<f64>,
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
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Product,
    #[sea_orm(has_many = "super::agent_logs::Entity")]
    AgentLogs,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::agent_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AgentLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! SeaORM adapter for the forecasts table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use super::Page;
use crate::entities::forecasts::{self, ForecastStatus};

pub mod dto;

pub use dto::{AgentSections, ForecastResults};

pub async fn create_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
) -> Result<forecasts::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    forecasts::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        status: Set(ForecastStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
}

pub async fn find_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    forecast_id: i64,
) -> Result<Option<forecasts::Model>, sea_orm::DbErr> {
    forecasts::Entity::find_by_id(forecast_id)
        .filter(forecasts::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Newest first.
pub async fn list_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    page: Page,
) -> Result<(Vec<forecasts::Model>, u64), sea_orm::DbErr> {
    let total = forecasts::Entity::find()
        .filter(forecasts::Column::UserId.eq(user_id))
        .count(conn)
        .await?;
    let rows = forecasts::Entity::find()
        .filter(forecasts::Column::UserId.eq(user_id))
        .order_by_desc(forecasts::Column::CreatedAt)
        .order_by_desc(forecasts::Column::Id)
        .offset(page.skip)
        .limit(page.limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn mark_processing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    forecast_id: i64,
    started_at: OffsetDateTime,
) -> Result<forecasts::Model, sea_orm::DbErr> {
    forecasts::ActiveModel {
        id: Set(forecast_id),
        status: Set(ForecastStatus::Processing),
        processing_started_at: Set(Some(started_at)),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    }
    .update(conn)
    .await
}

pub async fn mark_failed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    forecast_id: i64,
    error_message: String,
    duration_seconds: f64,
) -> Result<forecasts::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    forecasts::ActiveModel {
        id: Set(forecast_id),
        status: Set(ForecastStatus::Failed),
        error_message: Set(Some(error_message)),
        processing_completed_at: Set(Some(now)),
        processing_duration_seconds: Set(Some(duration_seconds)),
        updated_at: Set(now),
        ..Default::default()
    }
    .update(conn)
    .await
}

pub async fn store_results<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    forecast_id: i64,
    dto: ForecastResults,
) -> Result<forecasts::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let ForecastResults {
        summaries, data, ..
    } = dto;
    forecasts::ActiveModel {
        id: Set(forecast_id),
        user_id: NotSet,
        product_id: NotSet,
        target_city_id: Set(dto.target_city_id),
        status: Set(ForecastStatus::Completed),
        error_message: Set(None),
        processing_started_at: NotSet,
        processing_completed_at: Set(Some(dto.completed_at.unwrap_or(now))),
        processing_duration_seconds: Set(Some(dto.duration_seconds)),
        demand_score: Set(Some(dto.demand_score)),
        competition_index: Set(Some(dto.competition_index)),
        profitability_score: Set(Some(dto.profitability_score)),
        market_fit_score: Set(Some(dto.market_fit_score)),
        risk_score: Set(Some(dto.risk_score)),
        overall_score: Set(Some(dto.overall_score)),
        expected_monthly_sales_volume: Set(Some(dto.expected_monthly_sales_volume)),
        expected_annual_revenue: Set(Some(dto.expected_annual_revenue)),
        expected_profit_margin: Set(Some(dto.expected_profit_margin)),
        recommended_price: Set(Some(dto.recommended_price)),
        recommended_price_min: Set(Some(dto.recommended_price_min)),
        recommended_price_max: Set(Some(dto.recommended_price_max)),
        price_elasticity: Set(Some(dto.price_elasticity)),
        city_rankings: Set(Some(dto.city_rankings)),
        product_analysis_summary: Set(Some(summaries.product)),
        market_analysis_summary: Set(Some(summaries.market)),
        advertising_strategy_summary: Set(Some(summaries.advertising)),
        supply_chain_summary: Set(Some(summaries.supply_chain)),
        sales_strategy_summary: Set(Some(summaries.sales)),
        product_analysis_data: Set(Some(data.product)),
        market_analysis_data: Set(Some(data.market)),
        advertising_strategy_data: Set(Some(data.advertising)),
        supply_chain_data: Set(Some(data.supply_chain)),
        sales_strategy_data: Set(Some(data.sales)),
        model_version: Set(Some(dto.model_version)),
        tokens_used: Set(Some(dto.tokens_used)),
        cost_usd: Set(Some(dto.cost_usd)),
        created_at: NotSet,
        updated_at: Set(now),
    }
    .update(conn)
    .await
}

pub async fn count_forecasts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    forecasts::Entity::find().count(conn).await
}

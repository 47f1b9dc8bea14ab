//! SeaORM adapter for the cities table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::cities;

#[derive(Debug, Clone)]
pub struct CityCreate {
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub region: Option<String>,
    pub population: i64,
    pub population_density: Option<f64>,
    pub gdp_per_capita: Option<f64>,
    pub purchasing_power_index: f64,
    pub ecommerce_penetration: f64,
    pub competition_density: f64,
    pub internet_penetration: Option<f64>,
    pub logistics_infrastructure_score: Option<f64>,
    pub average_order_value: Option<f64>,
}

pub async fn create_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: CityCreate,
) -> Result<cities::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    cities::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        country: Set(dto.country),
        country_code: Set(dto.country_code),
        region: Set(dto.region),
        population: Set(dto.population),
        population_density: Set(dto.population_density),
        gdp_per_capita: Set(dto.gdp_per_capita),
        purchasing_power_index: Set(dto.purchasing_power_index),
        ecommerce_penetration: Set(dto.ecommerce_penetration),
        competition_density: Set(dto.competition_density),
        internet_penetration: Set(dto.internet_penetration),
        logistics_infrastructure_score: Set(dto.logistics_infrastructure_score),
        average_order_value: Set(dto.average_order_value),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// Unordered; ranking happens in the domain layer.
pub async fn list_with_min_population<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    min_population: i64,
) -> Result<Vec<cities::Model>, sea_orm::DbErr> {
    cities::Entity::find()
        .filter(cities::Column::Population.gte(min_population))
        .all(conn)
        .await
}

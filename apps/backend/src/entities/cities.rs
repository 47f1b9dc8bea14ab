use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub country: String,
    #[sea_orm(column_name = "country_code")]
    pub country_code: String,
    pub region: Option<String>,
    pub population: i64,
    #[sea_orm(column_name = "population_density", column_type = "Double", nullable)]
    pub population_density: Option<f64>,
    #[sea_orm(column_name = "gdp_per_capita", column_type = "Double", nullable)]
    pub gdp_per_capita: Option<f64>,
    #[sea_orm(column_name = "purchasing_power_index", column_type = "Double")]
    pub purchasing_power_index: f64,
    #[sea_orm(column_name = "ecommerce_penetration", column_type = "Double")]
    pub ecommerce_penetration: f64,
    #[sea_orm(column_name = "competition_density", column_type = "Double")]
    pub competition_density: f64,
    #[sea_orm(column_name = "internet_penetration", column_type = "Double", nullable)]
    pub internet_penetration: Option<f64>,
    #[sea_orm(
        column_name = "logistics_infrastructure_score",
        column_type = "Double",
        nullable
    )]
    pub logistics_infrastructure_score: Option<f64>,
    #[sea_orm(column_name = "average_order_value", column_type = "Double", nullable)]
    pub average_order_value: Option<f64>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

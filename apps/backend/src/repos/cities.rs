//! City repository functions; rows map onto `domain::cities::City`.

use sea_orm::ConnectionTrait;

use crate::adapters::cities_sea as cities_adapter;
use crate::domain::cities::City;
use crate::entities::cities;
use crate::errors::domain::DomainError;

pub use cities_adapter::CityCreate;

pub async fn create_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: CityCreate,
) -> Result<City, DomainError> {
    let city = cities_adapter::create_city(conn, dto).await?;
    Ok(City::from(city))
}

pub async fn list_with_min_population<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    min_population: i64,
) -> Result<Vec<City>, DomainError> {
    let rows = cities_adapter::list_with_min_population(conn, min_population).await?;
    Ok(rows.into_iter().map(City::from).collect())
}

impl From<cities::Model> for City {
    fn from(model: cities::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            country: model.country,
            country_code: model.country_code,
            region: model.region,
            population: model.population,
            population_density: model.population_density,
            gdp_per_capita: model.gdp_per_capita,
            purchasing_power_index: model.purchasing_power_index,
            ecommerce_penetration: model.ecommerce_penetration,
            competition_density: model.competition_density,
            internet_penetration: model.internet_penetration,
            logistics_infrastructure_score: model.logistics_infrastructure_score,
            average_order_value: model.average_order_value,
            created_at: model.created_at,
        }
    }
}

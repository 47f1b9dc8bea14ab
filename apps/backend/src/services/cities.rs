//! Market city catalog.

use sea_orm::ConnectionTrait;
use serde::Deserialize;
use tracing::info;

use crate::domain::cities::{rank_by_attractiveness, City};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::repos::cities::{self, CityCreate};

fn default_ppi() -> f64 {
    100.0
}

fn default_fifty() -> f64 {
    50.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCity {
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub region: Option<String>,
    pub population: i64,
    pub population_density: Option<f64>,
    pub gdp_per_capita: Option<f64>,
    #[serde(default = "default_ppi")]
    pub purchasing_power_index: f64,
    #[serde(default = "default_fifty")]
    pub ecommerce_penetration: f64,
    #[serde(default = "default_fifty")]
    pub competition_density: f64,
    pub internet_penetration: Option<f64>,
    pub logistics_infrastructure_score: Option<f64>,
    pub average_order_value: Option<f64>,
}

fn validate(city: &NewCity) -> Result<(), DomainError> {
    if city.name.trim().is_empty() || city.country.trim().is_empty() {
        return Err(DomainError::validation_other("name and country are required"));
    }
    let code = city.country_code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation_other(
            "country_code must be a two-letter ISO code",
        ));
    }
    if city.population < 0 {
        return Err(DomainError::validation_other("population cannot be negative"));
    }
    let percentages = [
        Some(city.ecommerce_penetration),
        Some(city.competition_density),
        city.internet_penetration,
        city.logistics_infrastructure_score,
    ];
    if percentages
        .into_iter()
        .flatten()
        .any(|p| !(0.0..=100.0).contains(&p))
    {
        return Err(DomainError::validation_other(
            "penetration, competition and logistics scores must be within 0..=100",
        ));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: NewCity,
) -> Result<City, AppError> {
    validate(&input)?;
    let city = cities::create_city(
        conn,
        CityCreate {
            name: input.name.trim().to_string(),
            country: input.country.trim().to_string(),
            country_code: input.country_code.trim().to_ascii_uppercase(),
            region: input.region,
            population: input.population,
            population_density: input.population_density,
            gdp_per_capita: input.gdp_per_capita,
            purchasing_power_index: input.purchasing_power_index,
            ecommerce_penetration: input.ecommerce_penetration,
            competition_density: input.competition_density,
            internet_penetration: input.internet_penetration,
            logistics_infrastructure_score: input.logistics_infrastructure_score,
            average_order_value: input.average_order_value,
        },
    )
    .await?;

    info!(city_id = city.id, location = %city.full_location(), "city created");
    Ok(city)
}

/// All cities, most attractive first, truncated to `limit`.
pub async fn ranked<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: usize,
) -> Result<Vec<City>, AppError> {
    let all = cities::list_with_min_population(conn, 0).await?;
    let mut ranked = rank_by_attractiveness(all);
    ranked.truncate(limit);
    Ok(ranked)
}

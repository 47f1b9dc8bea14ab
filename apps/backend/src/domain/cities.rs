//! Market cities: attractiveness scoring and per-forecast selection.

use std::cmp::Ordering;

use serde::Serialize;
use time::OffsetDateTime;

use super::forecast_engine::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub id: i64,
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
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl City {
    /// "Name, Region, Country", region omitted when unknown.
    pub fn full_location(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(region) = self.region.as_deref().filter(|r| !r.is_empty()) {
            parts.push(region);
        }
        parts.push(self.country.as_str());
        parts.join(", ")
    }

    /// Weighted 0..=100 market attractiveness, rounded to two decimals.
    pub fn attractiveness_score(&self) -> f64 {
        let infrastructure = self.internet_penetration.unwrap_or(50.0) * 0.5
            + self.logistics_infrastructure_score.unwrap_or(50.0) * 0.5;
        let density = self
            .population_density
            .map_or(50.0, |d| (d / 10.0).min(100.0));

        round2(
            0.25 * self.purchasing_power_index
                + 0.25 * self.ecommerce_penetration
                + 0.15 * density
                + 0.20 * (100.0 - self.competition_density)
                + 0.15 * infrastructure,
        )
    }
}

/// Sort by attractiveness, best first; ties keep their input order.
pub fn rank_by_attractiveness(mut cities: Vec<City>) -> Vec<City> {
    cities.sort_by(|a, b| {
        b.attractiveness_score()
            .partial_cmp(&a.attractiveness_score())
            .unwrap_or(Ordering::Equal)
    });
    cities
}

/// How many cities a forecast may analyze.
pub fn city_budget(requested: u64, plan_cities_limit: Option<u64>, max_per_forecast: u64) -> usize {
    let mut budget = requested.min(max_per_forecast);
    if let Some(limit) = plan_cities_limit {
        budget = budget.min(limit);
    }
    budget as usize
}

/// Eligible cities (population at or above `min_population`), best first,
/// truncated to `budget`.
pub fn select_for_forecast(cities: Vec<City>, min_population: i64, budget: usize) -> Vec<City> {
    let eligible = cities
        .into_iter()
        .filter(|c| c.population >= min_population)
        .collect();
    let mut ranked = rank_by_attractiveness(eligible);
    ranked.truncate(budget);
    ranked
}

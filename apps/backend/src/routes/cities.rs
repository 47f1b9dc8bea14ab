use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::domain::cities::City;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::services::cities as city_service;
use crate::state::app_state::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct RankedCity {
    #[serde(flatten)]
    city: City,
    full_location: String,
    attractiveness_score: f64,
}

async fn list(
    _current: CurrentUser,
    query: web::Query<CityQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let cities = city_service::ranked(require_db(&app_state)?, limit).await?;

    let ranked: Vec<RankedCity> = cities
        .into_iter()
        .map(|city| RankedCity {
            full_location: city.full_location(),
            attractiveness_score: city.attractiveness_score(),
            city,
        })
        .collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "cities": ranked })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("/", web::get().to(list));
}

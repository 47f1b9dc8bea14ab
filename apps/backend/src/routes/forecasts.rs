use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{CurrentUser, PageParams, ValidatedJson};
use crate::repos::deep_reports::ReportType;
use crate::repos::forecasts::Forecast;
use crate::services::{deep_reports, forecasts as forecast_service};
use crate::state::app_state::AppState;

const DEFAULT_LIMIT: u64 = 20;

#[derive(Debug, Deserialize)]
pub struct CreateForecastRequest {
    pub product_id: i64,
    pub max_cities: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct DeepReportRequest {
    pub report_type: ReportType,
}

#[derive(Debug, Serialize)]
struct ForecastList {
    forecasts: Vec<Forecast>,
    total: u64,
    skip: u64,
    limit: u64,
}

/// Runs the full agent pipeline before responding.
async fn create(
    current: CurrentUser,
    body: ValidatedJson<CreateForecastRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let forecast =
        forecast_service::create(&app_state, current.id, body.product_id, body.max_cities).await?;
    Ok(HttpResponse::Created().json(forecast))
}

async fn get(
    current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let forecast =
        forecast_service::get(require_db(&app_state)?, current.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(forecast))
}

async fn list(
    current: CurrentUser,
    query: web::Query<PageParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = query.page(DEFAULT_LIMIT)?;
    let (forecasts, total) =
        forecast_service::list(require_db(&app_state)?, current.id, page).await?;
    Ok(HttpResponse::Ok().json(ForecastList {
        forecasts,
        total,
        skip: page.skip,
        limit: page.limit,
    }))
}

async fn agent_logs(
    current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let logs =
        forecast_service::agent_logs(require_db(&app_state)?, current.id, path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(logs))
}

async fn create_deep_report(
    current: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<DeepReportRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let report =
        deep_reports::purchase(&app_state, current.id, path.into_inner(), body.report_type)
            .await?;
    Ok(HttpResponse::Created().json(report))
}

async fn list_deep_reports(
    current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let reports =
        deep_reports::list(require_db(&app_state)?, current.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reports))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::post().to(create))
        .route("", web::get().to(list))
        .route("/", web::get().to(list))
        .route("/{forecast_id}", web::get().to(get))
        .route("/{forecast_id}/agent-logs", web::get().to(agent_logs))
        .service(
            web::resource("/{forecast_id}/deep-reports")
                .route(web::post().to(create_deep_report))
                .route(web::get().to(list_deep_reports)),
        );
}

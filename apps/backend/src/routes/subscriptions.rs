use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::domain::plans::catalog;
use crate::entities::subscriptions::{PlanType, SubscriptionStatus};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::subscriptions::Subscription;
use crate::services::subscriptions as subscription_service;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct SubscriptionView {
    pub id: i64,
    pub plan_type: PlanType,
    pub status: SubscriptionStatus,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub current_period_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub current_period_end: Option<OffsetDateTime>,
    pub cancel_at_period_end: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
    /// `null` is unlimited
    pub forecasts_limit: Option<i32>,
    pub forecasts_used: i32,
    pub cities_limit: i32,
    pub api_calls_limit: Option<i32>,
    pub api_calls_used: i32,
}

impl From<Subscription> for SubscriptionView {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            is_active: sub.is_active(),
            plan_type: sub.plan_type,
            status: sub.status,
            current_period_start: sub.current_period_start,
            current_period_end: sub.current_period_end,
            cancel_at_period_end: sub.cancel_at_period_end,
            cancelled_at: sub.cancelled_at,
            forecasts_limit: sub.forecasts_limit,
            forecasts_used: sub.forecasts_used,
            cities_limit: sub.cities_limit,
            api_calls_limit: sub.api_calls_limit,
            api_calls_used: sub.api_calls_used,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub plan_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub cancel_immediately: bool,
}

async fn current(
    current: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let sub = subscription_service::current(require_db(&app_state)?, current.id).await?;
    Ok(HttpResponse::Ok().json(SubscriptionView::from(sub)))
}

async fn checkout(
    current: CurrentUser,
    body: ValidatedJson<CheckoutRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session =
        subscription_service::checkout(require_db(&app_state)?, current.id, &body.plan_type)
            .await?;
    Ok(HttpResponse::Ok().json(session))
}

async fn cancel(
    current: CurrentUser,
    body: ValidatedJson<CancelRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let sub = subscription_service::cancel(
        require_db(&app_state)?,
        current.id,
        body.cancel_immediately,
    )
    .await?;
    Ok(HttpResponse::Ok().json(SubscriptionView::from(sub)))
}

async fn plans() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "plans": catalog() }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/current", web::get().to(current))
        .route("/checkout", web::post().to(checkout))
        .route("/cancel", web::post().to(cancel))
        .route("/plans", web::get().to(plans));
}

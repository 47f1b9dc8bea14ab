use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::require_db;
use crate::entities::subscriptions::PlanType;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::subscriptions;
use crate::services::api_keys as api_key_service;
use crate::services::subscriptions::require_tier;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    pub name: String,
    pub expires_in_days: Option<u32>,
}

/// API keys are a pro feature.
async fn require_pro(current: &CurrentUser, app_state: &AppState) -> Result<(), AppError> {
    let sub = subscriptions::find_by_user(require_db(app_state)?, current.id).await?;
    require_tier(sub.as_ref(), PlanType::Pro)?;
    Ok(())
}

async fn create(
    current: CurrentUser,
    body: ValidatedJson<CreateKeyRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_pro(&current, &app_state).await?;
    let issued = api_key_service::issue(
        require_db(&app_state)?,
        current.id,
        &body.name,
        body.expires_in_days,
    )
    .await?;
    Ok(HttpResponse::Created().json(issued))
}

async fn list(
    current: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_pro(&current, &app_state).await?;
    let keys = api_key_service::list(require_db(&app_state)?, current.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "api_keys": keys })))
}

async fn revoke(
    current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_pro(&current, &app_state).await?;
    api_key_service::revoke(require_db(&app_state)?, current.id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["", "/"])
            .route(web::post().to(create))
            .route(web::get().to(list)),
    )
    .route("/{key_id}", web::delete().to(revoke));
}

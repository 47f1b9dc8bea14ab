use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{AdminUser, PageParams, ValidatedJson};
use crate::routes::auth::UserView;
use crate::routes::subscriptions::SubscriptionView;
use crate::services::admin as admin_service;
use crate::services::cities::{self as city_service, NewCity};
use crate::state::app_state::AppState;

const DEFAULT_LIMIT: u64 = 50;

#[derive(Debug, Serialize)]
struct UserList {
    users: Vec<UserView>,
    total: u64,
    skip: u64,
    limit: u64,
}

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub plan: String,
}

async fn stats(_admin: AdminUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = admin_service::stats(require_db(&app_state)?).await?;
    Ok(HttpResponse::Ok().json(stats))
}

async fn list_users(
    _admin: AdminUser,
    query: web::Query<PageParams>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = query.page(DEFAULT_LIMIT)?;
    let (users, total) = admin_service::list_users(require_db(&app_state)?, page).await?;
    Ok(HttpResponse::Ok().json(UserList {
        users: users.into_iter().map(UserView::from).collect(),
        total,
        skip: page.skip,
        limit: page.limit,
    }))
}

async fn set_active(
    admin: AdminUser,
    user_id: i64,
    active: bool,
    app_state: &AppState,
) -> Result<HttpResponse, AppError> {
    let user = admin_service::set_active(require_db(app_state)?, user_id, active).await?;
    info!(admin_id = admin.id, user_id, active, "admin changed user activation");
    Ok(HttpResponse::Ok().json(UserView::from(user)))
}

async fn activate(
    admin: AdminUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    set_active(admin, path.into_inner(), true, &app_state).await
}

async fn deactivate(
    admin: AdminUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    set_active(admin, path.into_inner(), false, &app_state).await
}

async fn grant_subscription(
    admin: AdminUser,
    path: web::Path<i64>,
    body: ValidatedJson<GrantRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let sub =
        admin_service::grant_subscription(require_db(&app_state)?, user_id, &body.plan).await?;
    info!(admin_id = admin.id, user_id, "admin granted subscription");
    Ok(HttpResponse::Ok().json(SubscriptionView::from(sub)))
}

async fn create_city(
    _admin: AdminUser,
    body: ValidatedJson<NewCity>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let city = city_service::create(require_db(&app_state)?, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(city))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(stats))
        .route("/users", web::get().to(list_users))
        .route("/users/{user_id}/activate", web::post().to(activate))
        .route("/users/{user_id}/deactivate", web::post().to(deactivate))
        .route("/users/{user_id}/subscription", web::post().to(grant_subscription))
        .route("/cities", web::post().to(create_city));
}

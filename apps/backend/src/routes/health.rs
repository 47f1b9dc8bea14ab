use actix_web::{web, HttpResponse};
use migration::get_latest_migration_version;
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct RootResponse {
    message: String,
    version: String,
    health: &'static str,
}

pub async fn root(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let settings = &app_state.settings;
    Ok(HttpResponse::Ok().json(RootResponse {
        message: format!("Welcome to {}", settings.app_name),
        version: settings.app_version.clone(),
        health: "/health",
    }))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app: String,
    version: String,
    environment: String,
    db: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    migrations: String,
    time: String,
}

/// `(db, db_error, migrations)` as reported by `/health`.
async fn check_db(app_state: &AppState) -> (&'static str, Option<String>, String) {
    let db = match require_db(app_state) {
        Ok(db) => db,
        Err(e) => return ("error", Some(format!("DB unavailable: {e}")), "unknown".into()),
    };

    let ping = Statement::from_string(db.get_database_backend(), "SELECT 1 AS health_check");
    if let Err(e) = db.query_one(ping).await {
        warn!(error = %e, "health check query failed");
        return ("error", Some(format!("DB query failed: {e}")), "unknown".into());
    }

    let migrations = match get_latest_migration_version(db).await {
        Ok(Some(version)) => version,
        Ok(None) => "no_migrations".to_string(),
        Err(_) => "unknown".to_string(),
    };
    ("ok", None, migrations)
}

/// Always 200; a broken database shows up as `status: degraded`.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let (db, db_error, migrations) = check_db(&app_state).await;
    let settings = &app_state.settings;

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: if db_error.is_none() { "healthy" } else { "degraded" },
        app: settings.app_name.clone(),
        version: settings.app_version.clone(),
        environment: settings.environment.clone(),
        db,
        db_error,
        migrations,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health));
}

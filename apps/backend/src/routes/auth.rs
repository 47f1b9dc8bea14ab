use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::users::User;
use crate::services::auth::{self as auth_service, Registration};
use crate::state::app_state::AppState;

/// Public view of a user; never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub login_count: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            company_name: user.company_name,
            role: user.role,
            is_active: user.is_active,
            is_verified: user.is_verified,
            login_count: user.login_count,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user = auth_service::register(
        require_db(&app_state)?,
        Registration {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            company_name: body.company_name,
        },
    )
    .await?;
    Ok(HttpResponse::Created().json(UserView::from(user)))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tokens = auth_service::login(
        require_db(&app_state)?,
        &app_state.security,
        &body.email,
        &body.password,
    )
    .await?;
    Ok(HttpResponse::Ok().json(tokens))
}

async fn refresh(
    body: ValidatedJson<RefreshRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tokens = auth_service::refresh(
        require_db(&app_state)?,
        &app_state.security,
        &body.refresh_token,
    )
    .await?;
    Ok(HttpResponse::Ok().json(tokens))
}

async fn me(current: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(UserView::from(current.user)))
}

async fn change_password(
    current: CurrentUser,
    body: ValidatedJson<ChangePasswordRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth_service::change_password(
        require_db(&app_state)?,
        &current.user,
        &body.current_password,
        &body.new_password,
    )
    .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password updated successfully" })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/refresh", web::post().to(refresh))
        .route("/me", web::get().to(me))
        .route("/change-password", web::post().to(change_password));
}

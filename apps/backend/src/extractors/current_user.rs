use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::db::require_db;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ForbiddenKind};
use crate::errors::ErrorCode;
use crate::repos::users::{self, User};
use crate::services::api_keys;
use crate::state::app_state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// The authenticated, active user behind the request.
///
/// Bearer claims stored by `JwtExtract` take precedence; without them a
/// valid `X-API-Key` header authenticates the key's owner.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub via_api_key: bool,
}

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

fn unknown_user() -> AppError {
    AppError::unauthorized(ErrorCode::Unauthorized, "User not found")
}

fn api_key_from(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = req.extensions().get::<Claims>().cloned();
            let api_key = api_key_from(&req);

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;
            let db = require_db(app_state)?;

            let (user, via_api_key) = match (claims, api_key) {
                (Some(claims), _) => {
                    let user = users::find_by_sub(db, &claims.sub)
                        .await?
                        .ok_or_else(unknown_user)?;
                    (user, false)
                }
                (None, Some(raw)) => {
                    let key = api_keys::authenticate(db, &raw).await?;
                    let user = users::find_by_id(db, key.user_id)
                        .await?
                        .ok_or_else(unknown_user)?;
                    debug!(user_id = user.id, key_id = key.id, "authenticated by api key");
                    (user, true)
                }
                (None, None) => return Err(AppError::unauthorized_missing_bearer()),
            };

            if !user.is_active {
                return Err(
                    DomainError::forbidden(ForbiddenKind::UserInactive, "User account is inactive")
                        .into(),
                );
            }

            Ok(CurrentUser { user, via_api_key })
        })
    }
}

/// A `CurrentUser` whose role is admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl Deref for AdminUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0.user
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentUser::from_request(req, payload);

        Box::pin(async move {
            let current = current.await?;
            if !current.is_admin() {
                return Err(DomainError::forbidden(
                    ForbiddenKind::AdminRequired,
                    "Administrator access required",
                )
                .into());
            }
            Ok(AdminUser(current))
        })
    }
}

//! Bearer token verification for the API scopes.
//!
//! A request without an `Authorization` header passes through untouched
//! so API-key callers and public endpoints keep working; `CurrentUser`
//! decides later whether the request is authenticated. A header that is
//! present must carry a valid access token, otherwise the request is
//! answered with a 401 ProblemDetails before reaching a handler.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::TokenType;
use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match bearer_token(req.headers().get(header::AUTHORIZATION)) {
            Ok(Some(token)) => token,
            Ok(None) => return self.forward(req),
            Err(err) => return reject(req, err),
        };

        let Some(app_state) = req.app_data::<web::Data<AppState>>().cloned() else {
            return reject(req, AppError::internal("AppState not available"));
        };

        match verify_token(&token, TokenType::Access, &app_state.security) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                self.forward(req)
            }
            Err(err) => reject(req, err),
        }
    }
}

impl<S, B> JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    fn forward(
        &self,
        req: ServiceRequest,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}

/// Answers the request here; the response is built when the future is
/// polled, inside the caller's trace scope.
fn reject<B: 'static>(
    req: ServiceRequest,
    err: AppError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
    Box::pin(async move { Ok(req.error_response(err).map_into_right_body()) })
}

/// `Ok(None)` when the header is absent; an error when it is present but
/// not of the form `Bearer <token>`.
pub fn bearer_token(value: Option<&HeaderValue>) -> Result<Option<String>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;
    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(Some(token.to_string()))
        }
        _ => Err(AppError::unauthorized_missing_bearer()),
    }
}

use std::future::{ready, Ready};
use std::time::{Duration, Instant};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

/// Forecast creation runs the whole agent pipeline, so only flag
/// requests well beyond a normal CRUD round trip.
const SLOW_REQUEST: Duration = Duration::from_secs(5);

/// One `request_completed` event per request, leveled by status class.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

struct Completed {
    method: String,
    path: String,
    trace_id: String,
    authenticated: bool,
    status: StatusCode,
    elapsed: Duration,
}

impl Completed {
    fn emit(&self) {
        let status_code = self.status.as_u16();
        let duration_us = self.elapsed.as_micros() as u64;
        let slow = self.elapsed >= SLOW_REQUEST;
        let (method, path, trace_id) = (&self.method, &self.path, &self.trace_id);
        let authenticated = self.authenticated;

        if self.status.is_server_error() {
            error!(http.method=%method, url.path=%path, http.status_code=status_code, duration_us, slow, authenticated, trace_id=%trace_id, message="request_completed");
        } else if self.status.is_client_error() || slow {
            warn!(http.method=%method, url.path=%path, http.status_code=status_code, duration_us, slow, authenticated, trace_id=%trace_id, message="request_completed");
        } else {
            info!(http.method=%method, url.path=%path, http.status_code=status_code, duration_us, slow, authenticated, trace_id=%trace_id, message="request_completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        // presence only; the credential itself never reaches the log
        let authenticated = req.headers().contains_key("authorization")
            || req.headers().contains_key("x-api-key");

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            Completed {
                method,
                path,
                trace_id,
                authenticated,
                status,
                elapsed: start.elapsed(),
            }
            .emit();

            result
        })
    }
}

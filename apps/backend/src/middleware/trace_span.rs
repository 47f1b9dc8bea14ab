//! `http_request` span around each request.
//!
//! Fields: `trace_id`, `method`, `path`, `client_ip`. Agent and forecast
//! logs emitted while the pipeline runs inherit them. Must sit inside
//! `RequestTrace`, which stores the trace id.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{info_span, Instrument};

#[derive(Debug, Clone, Copy, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = req.extensions().get::<String>().cloned();
        let client_ip = req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string);

        let span = info_span!(
            "http_request",
            trace_id = trace_id.as_deref().unwrap_or("-"),
            method = %req.method(),
            path = req.path(),
            client_ip = client_ip.as_deref().unwrap_or("unknown"),
        );

        Box::pin(self.service.call(req).instrument(span))
    }
}

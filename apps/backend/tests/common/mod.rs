#![allow(dead_code)]

// tests/common/mod.rs
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use actix_web::test;
use bytes::Bytes;
use serde_json::Value;

// Logging is auto-installed for every test binary that includes `common`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// A fully read response, so status, headers and body can be inspected in any order.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub async fn read<B: MessageBody>(resp: ServiceResponse<B>) -> Self {
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = test::read_body(resp).await;
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body should be JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// ProblemDetails shape, code, status and trace id parity.
    pub fn assert_problem(&self, code: &str, status: StatusCode, detail: Option<&str>) {
        backend_test_support::problem_details::assert_problem_details_from_parts(
            self.status,
            &self.headers,
            &self.body,
            code,
            status,
            detail,
        );
    }
}

/// Call the service and read the whole response.
pub async fn send<S, B>(app: &S, req: Request) -> TestResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    TestResponse::read(test::call_service(app, req).await).await
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

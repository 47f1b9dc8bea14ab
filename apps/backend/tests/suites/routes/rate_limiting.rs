// Limits as wired in main.rs, with small budgets.

use std::net::SocketAddr;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use commerce_intel::config::RateLimits;
use commerce_intel::entities::subscriptions::PlanType;
use commerce_intel::middleware::rate_limit::{api_rate_limit_input, auth_rate_limit_config};
use commerce_intel::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use commerce_intel::routes;

use crate::support::factory::{grant_plan, register_user, API};
use crate::support::test_state::test_state;

async fn ok() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn limits(anon: u64, basic: u64) -> RateLimits {
    RateLimits {
        anon,
        basic,
        ..commerce_intel::config::Settings::for_tests().rate_limits
    }
}

fn from(ip: &str) -> SocketAddr {
    format!("{ip}:40000").parse().expect("socket addr")
}

#[actix_web::test]
async fn auth_limit_is_per_client_ip() {
    let limiter = RateLimiter::builder(
        InMemoryBackend::builder().build(),
        auth_rate_limit_config(&limits(2, 100)).build(),
    )
    .add_headers()
    .build();
    let app = test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(limiter)
            .route("/login", web::post().to(ok)),
    )
    .await;

    for i in 0..2 {
        let req = test::TestRequest::post()
            .uri("/login")
            .peer_addr(from("10.0.0.1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "request {} within limit", i + 1);
        assert!(resp.headers().contains_key("x-ratelimit-remaining"));
    }

    let req = test::TestRequest::post()
        .uri("/login")
        .peer_addr(from("10.0.0.1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let req = test::TestRequest::post()
        .uri("/login")
        .peer_addr(from("10.0.0.2"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "other clients keep their budget");
}

#[actix_web::test]
async fn api_limit_uses_basic_budget() {
    let limiter = RateLimiter::builder(
        InMemoryBackend::builder().build(),
        api_rate_limit_input(&limits(1, 3)),
    )
    .add_headers()
    .build();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .wrap(limiter)
            .route("/products", web::get().to(ok)),
    )
    .await;

    let mut statuses = Vec::new();
    for _ in 0..4 {
        let req = test::TestRequest::get()
            .uri("/products")
            .peer_addr(from("10.0.0.9"))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert_eq!(
        statuses,
        [
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );
}

#[actix_web::test]
async fn api_budget_follows_the_callers_plan() {
    let state = test_state().await;
    let limits = RateLimits {
        basic: 4,
        pro: 7,
        ..limits(100, 4)
    };
    let limiter = RateLimiter::builder(
        InMemoryBackend::builder().build(),
        api_rate_limit_input(&limits),
    )
    .add_headers()
    .build();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .wrap(limiter)
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| routes::configure(cfg, API)),
    )
    .await;

    // register and login count against the shared IP bucket
    let pro = register_user(&app).await;
    grant_plan(&state, pro.id, PlanType::Pro).await;
    let free = register_user(&app).await;

    let me = |token: &str| {
        test::TestRequest::get()
            .uri(&format!("{API}/auth/me"))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request()
    };

    for i in 0..7 {
        let resp = test::call_service(&app, me(&pro.access_token)).await;
        assert_eq!(resp.status(), StatusCode::OK, "pro request {}", i + 1);
    }
    let resp = test::call_service(&app, me(&pro.access_token)).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    for i in 0..4 {
        let resp = test::call_service(&app, me(&free.access_token)).await;
        assert_eq!(resp.status(), StatusCode::OK, "free request {}", i + 1);
    }
    let resp = test::call_service(&app, me(&free.access_token)).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

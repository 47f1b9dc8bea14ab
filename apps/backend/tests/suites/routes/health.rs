use actix_web::http::StatusCode;
use actix_web::test;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::test_state::test_state;

#[actix_web::test]
async fn root_points_at_health() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let resp = send(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["message"], "Welcome to Commerce Intelligence Platform");
    assert_eq!(body["health"], "/health");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn health_reports_database_and_migrations() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let resp = send(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["environment"], "test");
    assert!(body.get("db_error").is_none());
    let migrations = body["migrations"].as_str().expect("migrations");
    assert_ne!(migrations, "unknown");
    let time = body["time"].as_str().expect("time");
    assert!(OffsetDateTime::parse(time, &Rfc3339).is_ok());
}

#[actix_web::test]
async fn health_without_database_is_degraded_not_failed() {
    let state = commerce_intel::infra::state::build_state(commerce_intel::Settings::for_tests())
        .build()
        .await
        .expect("state without db");
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = send(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["db"], "error");
    assert!(body["db_error"].is_string());
}

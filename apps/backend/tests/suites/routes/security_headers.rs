use actix_web::test;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::factory::API;
use crate::support::test_state::test_state;

#[actix_web::test]
async fn api_errors_are_not_cacheable() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri(&format!("{API}/auth/me")).to_request();
    let resp = send(&app, req).await;

    assert_eq!(resp.header("cache-control"), Some("no-store"));
    assert_eq!(resp.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(resp.header("x-frame-options"), Some("DENY"));
    assert_eq!(
        resp.header("content-security-policy"),
        Some("default-src 'none'; frame-ancestors 'none'")
    );
}

#[actix_web::test]
async fn root_document_keeps_default_caching() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let resp = send(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert!(resp.header("cache-control").is_none());
    assert!(resp.header("strict-transport-security").is_some());
    assert_eq!(
        resp.header("content-security-policy"),
        Some("default-src 'self'; frame-ancestors 'none'")
    );
}

use actix_web::http::StatusCode;
use actix_web::test;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::factory::{register_user, API};
use crate::support::test_state::test_state;

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/login"))
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\": ")
        .to_request();

    send(&app, req)
        .await
        .assert_problem("BAD_REQUEST", StatusCode::BAD_REQUEST, None);
}

#[actix_web::test]
async fn missing_field_is_unprocessable() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/register"))
        .set_json(serde_json::json!({ "email": "a@example.test" }))
        .to_request();

    send(&app, req).await.assert_problem(
        "VALIDATION_ERROR",
        StatusCode::UNPROCESSABLE_ENTITY,
        Some("missing field"),
    );
}

#[actix_web::test]
async fn bad_query_types_are_unprocessable() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/products?limit=lots"))
        .insert_header(user.auth())
        .to_request();

    send(&app, req)
        .await
        .assert_problem("VALIDATION_ERROR", StatusCode::UNPROCESSABLE_ENTITY, None);
}

#[actix_web::test]
async fn error_trace_id_matches_request_id() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri(&format!("{API}/products")).to_request();
    let resp = send(&app, req).await;

    resp.assert_problem("UNAUTHORIZED_MISSING_BEARER", StatusCode::UNAUTHORIZED, None);
    let body = resp.json();
    assert_eq!(body["type"], "https://commerce-intel.dev/errors/UNAUTHORIZED_MISSING_BEARER");
    assert_eq!(resp.header("x-request-id"), body["trace_id"].as_str());
    assert_eq!(resp.header("x-trace-id"), body["trace_id"].as_str());
}

#[actix_web::test]
async fn rejected_bearer_is_rendered_with_the_request_trace_id() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    for uri in [format!("{API}/auth/me"), format!("{API}/products")] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = send(&app, req).await;

        resp.assert_problem("UNAUTHORIZED_INVALID_JWT", StatusCode::UNAUTHORIZED, None);
        let trace_id = resp.json()["trace_id"].as_str().map(str::to_owned);
        assert_ne!(trace_id.as_deref(), Some("unknown"), "{uri}");
        assert_eq!(resp.header("x-request-id"), trace_id.as_deref(), "{uri}");
    }
}

#[actix_web::test]
async fn scoped_routes_serve_authenticated_requests() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    for uri in [format!("{API}/auth/me"), format!("{API}/products")] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(user.auth())
            .to_request();
        let resp = send(&app, req).await;
        assert_eq!(resp.status, StatusCode::OK, "{uri}");
        assert!(resp.header("x-request-id").is_some());
    }
}

#[actix_web::test]
async fn successful_responses_carry_a_request_id() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let first = send(&app, test::TestRequest::get().uri("/").to_request()).await;
    let second = send(&app, test::TestRequest::get().uri("/").to_request()).await;

    let a = first.header("x-request-id").expect("request id");
    let b = second.header("x-request-id").expect("request id");
    assert_eq!(a.len(), 36);
    assert_ne!(a, b);
}

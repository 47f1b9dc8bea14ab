use actix_web::http::StatusCode;
use actix_web::test;
use commerce_intel::entities::subscriptions::PlanType;
use serde_json::json;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::factory::{grant_plan, register_user, API};
use crate::support::test_state::test_state;

#[actix_web::test]
async fn plans_lists_the_catalog_in_tier_order() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/subscriptions/plans"))
        .insert_header(user.auth())
        .to_request();
    let body = send(&app, req).await.json();

    let ids: Vec<&str> = body["plans"]
        .as_array()
        .expect("plans")
        .iter()
        .filter_map(|p| p["id"].as_str())
        .collect();
    assert_eq!(ids, ["basic", "pro", "master"]);
    assert_eq!(body["plans"][1]["price"], 79);
    assert!(body["plans"][2]["forecasts_limit"].is_null());
}

#[actix_web::test]
async fn current_without_subscription_is_not_found() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/subscriptions/current"))
        .insert_header(user.auth())
        .to_request();

    send(&app, req)
        .await
        .assert_problem("SUBSCRIPTION_NOT_FOUND", StatusCode::NOT_FOUND, None);
}

#[actix_web::test]
async fn current_reflects_granted_plan_limits() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let user = register_user(&app).await;
    grant_plan(&state, user.id, PlanType::Pro).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/subscriptions/current"))
        .insert_header(user.auth())
        .to_request();
    let body = send(&app, req).await.json();

    assert_eq!(body["plan_type"], "pro");
    assert_eq!(body["status"], "active");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["forecasts_limit"], 250);
    assert_eq!(body["cities_limit"], 50);
    assert_eq!(body["forecasts_used"], 0);
}

#[actix_web::test]
async fn checkout_returns_a_session_for_known_plans() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/subscriptions/checkout"))
        .insert_header(user.auth())
        .set_json(json!({ "plan_type": "Pro" }))
        .to_request();
    let resp = send(&app, req).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    let session_id = body["session_id"].as_str().expect("session id");
    assert!(session_id.starts_with("cs_"));
    assert!(body["checkout_url"]
        .as_str()
        .expect("checkout url")
        .ends_with(session_id));

    let req = test::TestRequest::post()
        .uri(&format!("{API}/subscriptions/checkout"))
        .insert_header(user.auth())
        .set_json(json!({ "plan_type": "platinum" }))
        .to_request();
    send(&app, req)
        .await
        .assert_problem("INVALID_PLAN", StatusCode::BAD_REQUEST, Some("platinum"));
}

#[actix_web::test]
async fn cancel_defaults_to_period_end() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let user = register_user(&app).await;
    grant_plan(&state, user.id, PlanType::Basic).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/subscriptions/cancel"))
        .insert_header(user.auth())
        .set_json(json!({}))
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["status"], "active");
    assert_eq!(body["cancel_at_period_end"], true);
    assert!(body["cancelled_at"].is_null());

    let req = test::TestRequest::post()
        .uri(&format!("{API}/subscriptions/cancel"))
        .insert_header(user.auth())
        .set_json(json!({ "cancel_immediately": true }))
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["is_active"], false);
    assert!(body["cancelled_at"].is_string());
}

#[actix_web::test]
async fn cancel_without_subscription_is_not_found() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/subscriptions/cancel"))
        .insert_header(user.auth())
        .set_json(json!({ "cancel_immediately": true }))
        .to_request();

    send(&app, req)
        .await
        .assert_problem("SUBSCRIPTION_NOT_FOUND", StatusCode::NOT_FOUND, None);
}

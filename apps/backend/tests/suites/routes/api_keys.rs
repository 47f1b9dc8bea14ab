use actix_web::http::StatusCode;
use actix_web::test;
use commerce_intel::entities::subscriptions::PlanType;
use serde_json::json;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::factory::{grant_plan, register_user, API};
use crate::support::test_state::test_state;

#[actix_web::test]
async fn keys_require_pro_tier() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let free = register_user(&app).await;
    let basic = register_user(&app).await;
    grant_plan(&state, basic.id, PlanType::Basic).await;

    for user in [&free, &basic] {
        let req = test::TestRequest::post()
            .uri(&format!("{API}/api-keys"))
            .insert_header(user.auth())
            .set_json(json!({ "name": "ci" }))
            .to_request();
        send(&app, req).await.assert_problem(
            "SUBSCRIPTION_TIER_REQUIRED",
            StatusCode::FORBIDDEN,
            Some("pro"),
        );
    }
}

#[actix_web::test]
async fn issued_key_authenticates_until_revoked() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let user = register_user(&app).await;
    grant_plan(&state, user.id, PlanType::Pro).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/api-keys"))
        .insert_header(user.auth())
        .set_json(json!({ "name": "reporting", "expires_in_days": 30 }))
        .to_request();
    let resp = send(&app, req).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let issued = resp.json();
    let raw = issued["key"].as_str().expect("raw key").to_string();
    let key_id = issued["id"].as_i64().expect("key id");
    assert!(raw.starts_with("ci_"));
    assert_eq!(issued["prefix"], raw[..8]);
    assert!(issued["expires_at"].is_string());

    let me = |key: &str| {
        test::TestRequest::get()
            .uri(&format!("{API}/auth/me"))
            .insert_header(("X-API-Key", key.to_string()))
            .to_request()
    };
    let resp = send(&app, me(&raw)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["id"], user.id);

    let req = test::TestRequest::get()
        .uri(&format!("{API}/api-keys"))
        .insert_header(user.auth())
        .to_request();
    let listed = send(&app, req).await.json();
    let keys = listed["api_keys"].as_array().expect("keys");
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["usage_count"], 1);
    assert!(keys[0].get("key").is_none());
    assert!(keys[0].get("key_hash").is_none());

    let req = test::TestRequest::delete()
        .uri(&format!("{API}/api-keys/{key_id}"))
        .insert_header(user.auth())
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::NO_CONTENT);

    send(&app, me(&raw))
        .await
        .assert_problem("INVALID_API_KEY", StatusCode::UNAUTHORIZED, None);
}

#[actix_web::test]
async fn unknown_keys_are_rejected() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/products"))
        .insert_header(("x-api-key", "ci_definitely-not-issued"))
        .to_request();

    send(&app, req)
        .await
        .assert_problem("INVALID_API_KEY", StatusCode::UNAUTHORIZED, None);
}

#[actix_web::test]
async fn revoking_someone_elses_key_is_not_found() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let owner = register_user(&app).await;
    let other = register_user(&app).await;
    grant_plan(&state, owner.id, PlanType::Pro).await;
    grant_plan(&state, other.id, PlanType::Master).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/api-keys"))
        .insert_header(owner.auth())
        .set_json(json!({ "name": "mine" }))
        .to_request();
    let key_id = send(&app, req).await.json()["id"].as_i64().expect("key id");

    let req = test::TestRequest::delete()
        .uri(&format!("{API}/api-keys/{key_id}"))
        .insert_header(other.auth())
        .to_request();

    send(&app, req)
        .await
        .assert_problem("API_KEY_NOT_FOUND", StatusCode::NOT_FOUND, None);
}

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use commerce_intel::agents::{AgentKind, ScriptedLlm};
use commerce_intel::db::require_db;
use commerce_intel::entities::subscriptions::{Column, Entity as Subscriptions, PlanType};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::factory::{
    create_forecast, create_product, grant_plan, register_user, seed_cities, API,
};
use crate::support::test_state::{test_state, test_state_with_llm};

#[actix_web::test]
async fn create_runs_every_agent_and_completes() {
    let llm = Arc::new(ScriptedLlm::new());
    let state = test_state_with_llm(llm.clone()).await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let product_id = create_product(&app, &user).await;

    let forecast = create_forecast(&app, &user, product_id).await;

    assert_eq!(forecast["status"], "completed");
    assert_eq!(forecast["product_id"], product_id);
    assert!(forecast["error_message"].is_null());
    assert!(forecast["target_city_id"].is_i64());
    let overall = forecast["overall_score"].as_f64().expect("overall score");
    assert!((0.0..=100.0).contains(&overall));
    assert!(forecast["processing_completed_at"].is_string());

    // the small town is below the population floor
    let rankings = forecast["city_rankings"].as_array().expect("rankings");
    assert_eq!(rankings.len(), 4);
    assert!(rankings.iter().all(|r| r["city_name"] != "Smallville"));

    assert_eq!(llm.call_count(), 5);
    for kind in [
        AgentKind::ProductAnalyst,
        AgentKind::MarketProfiler,
        AgentKind::AdvertisingPlanner,
        AgentKind::SupplyChainAdvisor,
        AgentKind::SalesStrategy,
    ] {
        assert_eq!(llm.calls_for(kind), 1, "{kind} should run once");
    }
}

#[actix_web::test]
async fn agent_logs_record_each_run() {
    let state = test_state().await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let product_id = create_product(&app, &user).await;
    let forecast_id = create_forecast(&app, &user, product_id).await["id"]
        .as_i64()
        .expect("forecast id");

    let req = test::TestRequest::get()
        .uri(&format!("{API}/forecasts/{forecast_id}/agent-logs"))
        .insert_header(user.auth())
        .to_request();
    let logs = send(&app, req).await.json();

    let logs = logs.as_array().expect("logs array");
    assert_eq!(logs.len(), 5);
    assert!(logs.iter().all(|l| l["is_successful"] == true));
    assert!(logs.iter().all(|l| l["forecast_id"] == forecast_id));
    assert!(logs.iter().any(|l| l["agent_kind"] == "market_profiler"));
}

#[actix_web::test]
async fn failing_product_analysis_fails_the_forecast_early() {
    let llm = Arc::new(ScriptedLlm::new().failing(AgentKind::ProductAnalyst, 400, "bad prompt"));
    let state = test_state_with_llm(llm.clone()).await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let product_id = create_product(&app, &user).await;

    let forecast = create_forecast(&app, &user, product_id).await;

    assert_eq!(forecast["status"], "failed");
    let message = forecast["error_message"].as_str().expect("error message");
    assert!(message.starts_with("Product analysis failed"), "{message}");
    assert!(forecast["overall_score"].is_null());
    assert_eq!(llm.calls_for(AgentKind::MarketProfiler), 0);

    let req = test::TestRequest::get()
        .uri(&format!("{API}/forecasts/{}/agent-logs", forecast["id"]))
        .insert_header(user.auth())
        .to_request();
    let logs = send(&app, req).await.json();
    assert_eq!(logs.as_array().map(Vec::len), Some(1));
    assert_eq!(logs[0]["is_successful"], false);
}

#[actix_web::test]
async fn create_without_eligible_cities_is_rejected() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let product_id = create_product(&app, &user).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/forecasts/create"))
        .insert_header(user.auth())
        .set_json(json!({ "product_id": product_id }))
        .to_request();

    send(&app, req)
        .await
        .assert_problem("NO_CITIES_AVAILABLE", StatusCode::BAD_REQUEST, None);
}

#[actix_web::test]
async fn create_for_someone_elses_product_is_not_found() {
    let state = test_state().await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let owner = register_user(&app).await;
    let intruder = register_user(&app).await;
    let product_id = create_product(&app, &owner).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/forecasts/create"))
        .insert_header(intruder.auth())
        .set_json(json!({ "product_id": product_id }))
        .to_request();

    send(&app, req)
        .await
        .assert_problem("PRODUCT_NOT_FOUND", StatusCode::NOT_FOUND, None);
}

#[actix_web::test]
async fn max_cities_limits_the_candidate_set() {
    let state = test_state().await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let product_id = create_product(&app, &user).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/forecasts/create"))
        .insert_header(user.auth())
        .set_json(json!({ "product_id": product_id, "max_cities": 2 }))
        .to_request();
    let forecast = send(&app, req).await.json();
    assert_eq!(forecast["city_rankings"].as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::post()
        .uri(&format!("{API}/forecasts/create"))
        .insert_header(user.auth())
        .set_json(json!({ "product_id": product_id, "max_cities": 0 }))
        .to_request();
    send(&app, req).await.assert_problem(
        "VALIDATION_ERROR",
        StatusCode::UNPROCESSABLE_ENTITY,
        Some("max_cities"),
    );
}

#[actix_web::test]
async fn subscription_quota_is_spent_and_enforced() {
    let state = test_state().await;
    seed_cities(&state).await;
    let db = require_db(&state).expect("db").clone();
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let user = register_user(&app).await;
    grant_plan(&state, user.id, PlanType::Basic).await;
    let product_id = create_product(&app, &user).await;

    create_forecast(&app, &user, product_id).await;
    let req = test::TestRequest::get()
        .uri(&format!("{API}/subscriptions/current"))
        .insert_header(user.auth())
        .to_request();
    assert_eq!(send(&app, req).await.json()["forecasts_used"], 1);

    Subscriptions::update_many()
        .col_expr(Column::ForecastsUsed, Expr::value(50))
        .filter(Column::UserId.eq(user.id))
        .exec(&db)
        .await
        .expect("exhaust quota");

    let req = test::TestRequest::post()
        .uri(&format!("{API}/forecasts/create"))
        .insert_header(user.auth())
        .set_json(json!({ "product_id": product_id }))
        .to_request();
    send(&app, req)
        .await
        .assert_problem("FORECAST_QUOTA_EXCEEDED", StatusCode::FORBIDDEN, None);
}

#[actix_web::test]
async fn list_and_get_are_scoped_to_owner() {
    let state = test_state().await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let owner = register_user(&app).await;
    let other = register_user(&app).await;
    let product_id = create_product(&app, &owner).await;
    let forecast_id = create_forecast(&app, &owner, product_id).await["id"]
        .as_i64()
        .expect("forecast id");

    let req = test::TestRequest::get()
        .uri(&format!("{API}/forecasts"))
        .insert_header(owner.auth())
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["forecasts"][0]["id"], forecast_id);

    let req = test::TestRequest::get()
        .uri(&format!("{API}/forecasts"))
        .insert_header(other.auth())
        .to_request();
    assert_eq!(send(&app, req).await.json()["total"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("{API}/forecasts/{forecast_id}"))
        .insert_header(other.auth())
        .to_request();
    send(&app, req)
        .await
        .assert_problem("FORECAST_NOT_FOUND", StatusCode::NOT_FOUND, None);
}

#[actix_web::test]
async fn deep_report_is_priced_by_type_and_listed() {
    let state = test_state().await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let product_id = create_product(&app, &user).await;
    let forecast_id = create_forecast(&app, &user, product_id).await["id"]
        .as_i64()
        .expect("forecast id");

    let req = test::TestRequest::post()
        .uri(&format!("{API}/forecasts/{forecast_id}/deep-reports"))
        .insert_header(user.auth())
        .set_json(json!({ "report_type": "premium" }))
        .to_request();
    let resp = send(&app, req).await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let report = resp.json();
    assert_eq!(report["report_type"], "premium");
    assert_eq!(report["price_paid"], 30.0);
    assert_eq!(report["currency"], "USD");
    assert!(report["payment_id"].is_i64());
    assert_eq!(report["report_data"]["forecast_id"], forecast_id);
    assert!(report["executive_summary"].is_string());

    let req = test::TestRequest::get()
        .uri(&format!("{API}/forecasts/{forecast_id}/deep-reports"))
        .insert_header(user.auth())
        .to_request();
    let reports = send(&app, req).await.json();
    assert_eq!(reports.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn deep_report_requires_completed_forecast() {
    let llm = Arc::new(ScriptedLlm::new().failing(AgentKind::MarketProfiler, 400, "nope"));
    let state = test_state_with_llm(llm).await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let product_id = create_product(&app, &user).await;
    let forecast = create_forecast(&app, &user, product_id).await;
    assert_eq!(forecast["status"], "failed");

    let req = test::TestRequest::post()
        .uri(&format!("{API}/forecasts/{}/deep-reports", forecast["id"]))
        .insert_header(user.auth())
        .set_json(json!({ "report_type": "standard" }))
        .to_request();

    send(&app, req)
        .await
        .assert_problem("FORECAST_NOT_COMPLETED", StatusCode::CONFLICT, None);
}

use std::sync::Arc;

use actix_web::http::StatusCode;
use commerce_intel::agents::ScriptedLlm;
use commerce_intel::db::require_db;
use commerce_intel::repos::deep_reports::ReportType;
use commerce_intel::repos::forecasts as forecast_repo;
use commerce_intel::services::{deep_reports, forecasts};
use commerce_intel::ErrorCode;

use super::fixtures;
use crate::support::factory::seed_cities;
use crate::support::test_state::test_state_with_llm;

#[tokio::test]
async fn each_report_type_charges_its_configured_price() {
    let state = test_state_with_llm(Arc::new(ScriptedLlm::new())).await;
    seed_cities(&state).await;
    let user = fixtures::user(&state).await;
    let product = fixtures::product(&state, user.id).await;
    let forecast = forecasts::create(&state, user.id, product.id, None)
        .await
        .expect("forecast");

    for (report_type, dollars) in [
        (ReportType::Standard, 10.0),
        (ReportType::Premium, 30.0),
        (ReportType::Enterprise, 50.0),
    ] {
        let report = deep_reports::purchase(&state, user.id, forecast.id, report_type)
            .await
            .expect("purchase");
        assert_eq!(report.report_type, report_type);
        assert_eq!(report.price_paid, dollars);
        assert!(report.payment_id.is_some());
        assert_eq!(report.download_count, 0);
    }

    let listed = deep_reports::list(require_db(&state).expect("db"), user.id, forecast.id)
        .await
        .expect("list");
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn pending_forecasts_cannot_be_reported() {
    let state = test_state_with_llm(Arc::new(ScriptedLlm::new())).await;
    let user = fixtures::user(&state).await;
    let product = fixtures::product(&state, user.id).await;
    let db = require_db(&state).expect("db");
    let pending = forecast_repo::create_pending(db, user.id, product.id)
        .await
        .expect("pending forecast");

    let err = deep_reports::purchase(&state, user.id, pending.id, ReportType::Standard)
        .await
        .expect_err("not completed");

    assert_eq!(err.code(), ErrorCode::ForecastNotCompleted);
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn reports_on_foreign_forecasts_are_not_found() {
    let state = test_state_with_llm(Arc::new(ScriptedLlm::new())).await;
    seed_cities(&state).await;
    let owner = fixtures::user(&state).await;
    let other = fixtures::user(&state).await;
    let product = fixtures::product(&state, owner.id).await;
    let forecast = forecasts::create(&state, owner.id, product.id, None)
        .await
        .expect("forecast");

    let err = deep_reports::purchase(&state, other.id, forecast.id, ReportType::Standard)
        .await
        .expect_err("foreign forecast");

    assert_eq!(err.code(), ErrorCode::ForecastNotFound);
}

use std::sync::Arc;

use commerce_intel::agents::{AgentKind, ScriptedLlm};
use commerce_intel::db::require_db;
use commerce_intel::entities::forecasts as forecast_rows;
use commerce_intel::entities::subscriptions::{self as subscription_rows, PlanType};
use commerce_intel::errors::ErrorCode;
use commerce_intel::repos::forecasts::ForecastStatus;
use commerce_intel::repos::subscriptions;
use commerce_intel::services::forecasts;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde_json::json;

use super::fixtures;
use crate::support::factory::{grant_plan, seed_cities};
use crate::support::test_state::test_state_with_llm;

#[tokio::test]
async fn late_agent_failure_still_completes_the_forecast() {
    let llm = Arc::new(ScriptedLlm::new().failing(AgentKind::AdvertisingPlanner, 400, "refused"));
    let state = test_state_with_llm(llm.clone()).await;
    seed_cities(&state).await;
    let user = fixtures::user(&state).await;
    let product = fixtures::product(&state, user.id).await;

    let forecast = forecasts::create(&state, user.id, product.id, None)
        .await
        .expect("forecast");

    assert_eq!(forecast.status, ForecastStatus::Completed);
    assert!(forecast.overall_score.is_some());
    assert!(forecast
        .advertising_strategy_data
        .as_ref()
        .map_or(true, |data| data == &json!({})));
    assert!(forecast.sales_strategy_data.is_some());
    assert_eq!(llm.calls_for(AgentKind::AdvertisingPlanner), 1);

    let logs = forecasts::agent_logs(require_db(&state).expect("db"), user.id, forecast.id)
        .await
        .expect("logs");
    assert_eq!(logs.len(), 5);
    let failed: Vec<_> = logs.iter().filter(|l| !l.is_successful).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].agent_kind, "advertising_planner");
    assert!(failed[0].error_message.is_some());
}

#[tokio::test]
async fn unparseable_market_reply_fails_the_forecast() {
    let llm = Arc::new(ScriptedLlm::new().with_reply(AgentKind::MarketProfiler, "no json here"));
    let state = test_state_with_llm(llm.clone()).await;
    seed_cities(&state).await;
    let user = fixtures::user(&state).await;
    let product = fixtures::product(&state, user.id).await;

    let forecast = forecasts::create(&state, user.id, product.id, Some(3))
        .await
        .expect("forecast row");

    assert_eq!(forecast.status, ForecastStatus::Failed);
    let message = forecast.error_message.expect("error message");
    assert!(message.starts_with("Market analysis failed"), "{message}");
    assert!(forecast.processing_duration_seconds.is_some());
    assert_eq!(llm.calls_for(AgentKind::SalesStrategy), 0);
}

#[tokio::test]
async fn forecasts_without_subscription_do_not_touch_quota() {
    let state = test_state_with_llm(Arc::new(ScriptedLlm::new())).await;
    seed_cities(&state).await;
    let user = fixtures::user(&state).await;
    let product = fixtures::product(&state, user.id).await;

    for _ in 0..2 {
        let f = forecasts::create(&state, user.id, product.id, Some(1))
            .await
            .expect("forecast");
        assert_eq!(f.status, ForecastStatus::Completed);
    }

    let db = require_db(&state).expect("db");
    let sub = commerce_intel::repos::subscriptions::find_by_user(db, user.id)
        .await
        .expect("lookup");
    assert!(sub.is_none());
}

#[tokio::test]
async fn concurrent_creates_cannot_overspend_the_last_forecast() {
    let state = test_state_with_llm(Arc::new(ScriptedLlm::new())).await;
    seed_cities(&state).await;
    let user = fixtures::user(&state).await;
    let product = fixtures::product(&state, user.id).await;
    grant_plan(&state, user.id, PlanType::Basic).await;

    let db = require_db(&state).expect("db");
    subscription_rows::Entity::update_many()
        .col_expr(subscription_rows::Column::ForecastsUsed, Expr::value(49))
        .filter(subscription_rows::Column::UserId.eq(user.id))
        .exec(db)
        .await
        .expect("set usage");

    let (a, b, c) = futures::join!(
        forecasts::create(&state, user.id, product.id, Some(1)),
        forecasts::create(&state, user.id, product.id, Some(1)),
        forecasts::create(&state, user.id, product.id, Some(1)),
    );
    let results = [a, b, c];

    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.code(), ErrorCode::ForecastQuotaExceeded);
    }

    let sub = subscriptions::find_by_user(db, user.id)
        .await
        .expect("lookup")
        .expect("subscription");
    assert_eq!(sub.forecasts_used, 50);
    assert_eq!(sub.forecasts_limit, Some(50));
}

#[tokio::test]
async fn spending_stops_at_the_plan_limit() {
    let state = test_state_with_llm(Arc::new(ScriptedLlm::new())).await;
    let user = fixtures::user(&state).await;
    grant_plan(&state, user.id, PlanType::Basic).await;
    let db = require_db(&state).expect("db");
    let sub = subscriptions::find_by_user(db, user.id)
        .await
        .expect("lookup")
        .expect("subscription");

    subscription_rows::Entity::update_many()
        .col_expr(subscription_rows::Column::ForecastsUsed, Expr::value(49))
        .filter(subscription_rows::Column::Id.eq(sub.id))
        .exec(db)
        .await
        .expect("set usage");

    subscriptions::spend_forecast(db, sub.id).await.expect("last unit");
    let err = subscriptions::spend_forecast(db, sub.id)
        .await
        .expect_err("limit reached");
    assert_eq!(commerce_intel::AppError::from(err).code(), ErrorCode::ForecastQuotaExceeded);
}

#[tokio::test]
async fn storage_failure_mid_run_marks_the_forecast_failed() {
    let state = test_state_with_llm(Arc::new(ScriptedLlm::new())).await;
    seed_cities(&state).await;
    let user = fixtures::user(&state).await;
    let product = fixtures::product(&state, user.id).await;
    let db = require_db(&state).expect("db");

    db.execute_unprepared("DROP TABLE agent_logs")
        .await
        .expect("drop agent_logs");

    forecasts::create(&state, user.id, product.id, Some(2))
        .await
        .expect_err("log write fails");

    let row = forecast_rows::Entity::find()
        .filter(forecast_rows::Column::UserId.eq(user.id))
        .one(db)
        .await
        .expect("query")
        .expect("forecast row");
    assert_eq!(row.status, ForecastStatus::Failed);
    let message = row.error_message.expect("error message");
    assert!(message.starts_with("Forecast processing failed"), "{message}");
}

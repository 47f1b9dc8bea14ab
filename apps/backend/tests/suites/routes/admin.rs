use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::factory::{admin_user, register_user, API};
use crate::support::test_state::test_state;

#[actix_web::test]
async fn non_admins_are_forbidden() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    for path in ["/admin/stats", "/admin/users"] {
        let req = test::TestRequest::get()
            .uri(&format!("{API}{path}"))
            .insert_header(user.auth())
            .to_request();
        send(&app, req)
            .await
            .assert_problem("ADMIN_REQUIRED", StatusCode::FORBIDDEN, None);
    }
}

#[actix_web::test]
async fn stats_count_users_and_activity() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let admin = admin_user(&state, &app).await;
    register_user(&app).await;
    register_user(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/admin/stats"))
        .insert_header(admin.auth())
        .to_request();
    let body = send(&app, req).await.json();

    assert_eq!(body["users"]["total"], 3);
    assert_eq!(body["users"]["active"], 3);
    assert_eq!(body["forecasts"]["total"], 0);
    assert_eq!(body["products"]["total"], 0);
    assert_eq!(body["subscriptions"]["active"], 0);
}

#[actix_web::test]
async fn users_are_paged() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let admin = admin_user(&state, &app).await;
    for _ in 0..3 {
        register_user(&app).await;
    }

    let req = test::TestRequest::get()
        .uri(&format!("{API}/admin/users?limit=2"))
        .insert_header(admin.auth())
        .to_request();
    let body = send(&app, req).await.json();

    assert_eq!(body["total"], 4);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["users"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn deactivated_users_are_locked_out_until_reactivated() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let admin = admin_user(&state, &app).await;
    let user = register_user(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/admin/users/{}/deactivate", user.id))
        .insert_header(admin.auth())
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["is_active"], false);

    let me = || {
        test::TestRequest::get()
            .uri(&format!("{API}/auth/me"))
            .insert_header(user.auth())
            .to_request()
    };
    send(&app, me())
        .await
        .assert_problem("USER_INACTIVE", StatusCode::FORBIDDEN, None);

    let req = test::TestRequest::post()
        .uri(&format!("{API}/admin/users/{}/activate", user.id))
        .insert_header(admin.auth())
        .to_request();
    assert_eq!(send(&app, req).await.json()["is_active"], true);
    assert_eq!(send(&app, me()).await.status, StatusCode::OK);
}

#[actix_web::test]
async fn admins_cannot_be_deactivated() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let admin = admin_user(&state, &app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/admin/users/{}/deactivate", admin.id))
        .insert_header(admin.auth())
        .to_request();

    send(&app, req)
        .await
        .assert_problem("CANNOT_DEACTIVATE_ADMIN", StatusCode::BAD_REQUEST, None);
}

#[actix_web::test]
async fn unknown_user_is_not_found() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let admin = admin_user(&state, &app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/admin/users/999999/activate"))
        .insert_header(admin.auth())
        .to_request();

    send(&app, req)
        .await
        .assert_problem("USER_NOT_FOUND", StatusCode::NOT_FOUND, None);
}

#[actix_web::test]
async fn grant_subscription_sets_plan() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let admin = admin_user(&state, &app).await;
    let user = register_user(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/admin/users/{}/subscription", user.id))
        .insert_header(admin.auth())
        .set_json(json!({ "plan": "master" }))
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["plan_type"], "master");
    assert!(body["forecasts_limit"].is_null());
    assert!(body["current_period_end"].is_string());

    let req = test::TestRequest::post()
        .uri(&format!("{API}/admin/users/{}/subscription", user.id))
        .insert_header(admin.auth())
        .set_json(json!({ "plan": "gold" }))
        .to_request();
    send(&app, req)
        .await
        .assert_problem("INVALID_PLAN", StatusCode::BAD_REQUEST, None);
}

#[actix_web::test]
async fn create_city_validates_country_code() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;
    let admin = admin_user(&state, &app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/admin/cities"))
        .insert_header(admin.auth())
        .set_json(json!({
            "name": "Utrecht",
            "country": "Netherlands",
            "country_code": "nl",
            "population": 360_000,
        }))
        .to_request();
    let resp = send(&app, req).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["country_code"], "NL");
    assert_eq!(body["purchasing_power_index"], 100.0);

    let req = test::TestRequest::post()
        .uri(&format!("{API}/admin/cities"))
        .insert_header(admin.auth())
        .set_json(json!({
            "name": "Atlantis",
            "country": "Ocean",
            "country_code": "ATL",
            "population": 1,
        }))
        .to_request();
    send(&app, req).await.assert_problem(
        "VALIDATION_ERROR",
        StatusCode::UNPROCESSABLE_ENTITY,
        Some("country_code"),
    );
}

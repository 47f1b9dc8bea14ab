use actix_web::http::StatusCode;
use actix_web::test;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::factory::{register_user, seed_cities, API};
use crate::support::test_state::test_state;

#[actix_web::test]
async fn cities_are_ranked_by_attractiveness() {
    let state = test_state().await;
    seed_cities(&state).await;
    let app = create_test_app(state).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/cities?limit=3"))
        .insert_header(user.auth())
        .to_request();
    let resp = send(&app, req).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    let cities = body["cities"].as_array().expect("cities");
    assert_eq!(cities.len(), 3);

    let scores: Vec<f64> = cities
        .iter()
        .filter_map(|c| c["attractiveness_score"].as_f64())
        .collect();
    assert_eq!(scores.len(), 3);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");

    let first = &cities[0];
    assert_eq!(
        first["full_location"],
        format!(
            "{}, {}",
            first["name"].as_str().expect("name"),
            first["country"].as_str().expect("country")
        )
    );
}

#[actix_web::test]
async fn cities_require_authentication() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri(&format!("{API}/cities")).to_request();

    send(&app, req)
        .await
        .assert_problem("UNAUTHORIZED_MISSING_BEARER", StatusCode::UNAUTHORIZED, None);
}

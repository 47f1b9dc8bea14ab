use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use commerce_intel::db::require_db;
use commerce_intel::entities::products;
use sea_orm::EntityTrait;

use crate::common::send;
use crate::support::app_builder::create_test_app;
use crate::support::factory::{create_product, product_body, register_user, API};
use crate::support::test_state::test_state;

#[actix_web::test]
async fn create_applies_defaults() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/products"))
        .insert_header(user.auth())
        .set_json(product_body())
        .to_request();
    let resp = send(&app, req).await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["category"], "sports_outdoors");
    assert_eq!(body["production_method"], "fason");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["base_price"], 29.5);
}

#[actix_web::test]
async fn in_house_production_method_is_stored_as_self() {
    let state = test_state().await;
    let db = require_db(&state).expect("db").clone();
    let app = create_test_app(state).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let mut body = product_body();
    body["production_method"] = json!("self");
    let req = test::TestRequest::post()
        .uri(&format!("{API}/products"))
        .insert_header(user.auth())
        .set_json(body)
        .to_request();
    let created = send(&app, req).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json()["id"].as_i64().expect("id");

    let row = products::Entity::find_by_id(id)
        .one(&db)
        .await
        .expect("query")
        .expect("row");
    assert_eq!(row.production_method.as_deref(), Some("self"));

    let req = test::TestRequest::get()
        .uri(&format!("{API}/products/{id}"))
        .insert_header(user.auth())
        .to_request();
    let fetched = send(&app, req).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["production_method"], "self");
}

#[actix_web::test]
async fn create_validates_price_and_category() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let mut zero_price = product_body();
    zero_price["base_price"] = json!(0);
    let req = test::TestRequest::post()
        .uri(&format!("{API}/products"))
        .insert_header(user.auth())
        .set_json(zero_price)
        .to_request();
    send(&app, req).await.assert_problem(
        "VALIDATION_ERROR",
        StatusCode::UNPROCESSABLE_ENTITY,
        Some("base_price"),
    );

    let mut bad_category = product_body();
    bad_category["category"] = json!("spaceships");
    let req = test::TestRequest::post()
        .uri(&format!("{API}/products"))
        .insert_header(user.auth())
        .set_json(bad_category)
        .to_request();
    send(&app, req)
        .await
        .assert_problem("VALIDATION_ERROR", StatusCode::UNPROCESSABLE_ENTITY, None);
}

#[actix_web::test]
async fn list_filters_and_pages_own_products() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let other = register_user(&app).await;

    for _ in 0..3 {
        create_product(&app, &user).await;
    }
    create_product(&app, &other).await;

    let mut electronics = product_body();
    electronics["category"] = json!("electronics");
    let req = test::TestRequest::post()
        .uri(&format!("{API}/products"))
        .insert_header(user.auth())
        .set_json(electronics)
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("{API}/products?skip=1&limit=2"))
        .insert_header(user.auth())
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["total"], 4);
    assert_eq!(body["skip"], 1);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["products"].as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::get()
        .uri(&format!("{API}/products?category=electronics"))
        .insert_header(user.auth())
        .to_request();
    let body = send(&app, req).await.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["category"], "electronics");
}

#[actix_web::test]
async fn list_rejects_out_of_range_limit() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/products?limit=101"))
        .insert_header(user.auth())
        .to_request();
    send(&app, req).await.assert_problem(
        "VALIDATION_ERROR",
        StatusCode::UNPROCESSABLE_ENTITY,
        Some("limit"),
    );
}

#[actix_web::test]
async fn update_patches_only_given_fields() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let id = create_product(&app, &user).await;

    let req = test::TestRequest::put()
        .uri(&format!("{API}/products/{id}"))
        .insert_header(user.auth())
        .set_json(json!({ "base_price": 35.0, "description": null, "is_active": false }))
        .to_request();
    let resp = send(&app, req).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["base_price"], 35.0);
    assert!(body["description"].is_null());
    assert_eq!(body["is_active"], false);
    assert_eq!(body["target_market"], "Hikers");
}

#[actix_web::test]
async fn delete_removes_product() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;
    let id = create_product(&app, &user).await;

    let req = test::TestRequest::delete()
        .uri(&format!("{API}/products/{id}"))
        .insert_header(user.auth())
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("{API}/products/{id}"))
        .insert_header(user.auth())
        .to_request();
    send(&app, req)
        .await
        .assert_problem("PRODUCT_NOT_FOUND", StatusCode::NOT_FOUND, None);
}

#[actix_web::test]
async fn other_users_products_look_missing() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let owner = register_user(&app).await;
    let intruder = register_user(&app).await;
    let id = create_product(&app, &owner).await;

    let get = test::TestRequest::get()
        .uri(&format!("{API}/products/{id}"))
        .insert_header(intruder.auth())
        .to_request();
    send(&app, get)
        .await
        .assert_problem("PRODUCT_NOT_FOUND", StatusCode::NOT_FOUND, None);

    let delete = test::TestRequest::delete()
        .uri(&format!("{API}/products/{id}"))
        .insert_header(intruder.auth())
        .to_request();
    send(&app, delete)
        .await
        .assert_problem("PRODUCT_NOT_FOUND", StatusCode::NOT_FOUND, None);
}

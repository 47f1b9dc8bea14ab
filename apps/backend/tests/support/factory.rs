//! Test data builders that go through the public HTTP surface where the
//! API allows it and through repos where it does not (admins, plans, cities).

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::unique_helpers::{unique_email, unique_str};
use commerce_intel::auth::password::hash_password;
use commerce_intel::db::require_db;
use commerce_intel::entities::subscriptions::PlanType;
use commerce_intel::entities::users::UserRole;
use commerce_intel::repos::{subscriptions, users};
use commerce_intel::services::cities::{self, NewCity};
use commerce_intel::state::app_state::AppState;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{bearer, send};

pub const PASSWORD: &str = "Password123";
pub const API: &str = "/api/v1";

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestUser {
    pub fn auth(&self) -> (&'static str, String) {
        bearer(&self.access_token)
    }
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/login"))
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = send(app, req).await;
    assert_eq!(resp.status, StatusCode::OK, "login failed: {:?}", resp.body);
    resp.json()
}

/// Register a fresh user over HTTP and log them in.
pub async fn register_user<S, B>(app: &S) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let email = unique_email("user");
    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/register"))
        .set_json(json!({
            "email": email,
            "password": PASSWORD,
            "full_name": "Test User",
        }))
        .to_request();
    let resp = send(app, req).await;
    assert_eq!(resp.status, StatusCode::CREATED, "register failed: {:?}", resp.body);
    let id = resp.json()["id"].as_i64().expect("user id");

    let tokens = login(app, &email, PASSWORD).await;
    TestUser {
        id,
        email,
        access_token: tokens["access_token"].as_str().expect("access token").to_string(),
        refresh_token: tokens["refresh_token"].as_str().expect("refresh token").to_string(),
    }
}

/// Admins cannot self-register, so the row is inserted directly.
pub async fn admin_user<S, B>(state: &AppState, app: &S) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let email = unique_email("admin");
    let hash = hash_password(PASSWORD).expect("hash password");
    let dto = users::UserCreate::new(Uuid::new_v4().to_string(), email.clone(), hash)
        .with_full_name("Admin User")
        .with_role(UserRole::Admin);
    let user = users::create_user(require_db(state).expect("db"), dto)
        .await
        .expect("create admin");

    let tokens = login(app, &email, PASSWORD).await;
    TestUser {
        id: user.id,
        email,
        access_token: tokens["access_token"].as_str().expect("access token").to_string(),
        refresh_token: tokens["refresh_token"].as_str().expect("refresh token").to_string(),
    }
}

pub async fn grant_plan(state: &AppState, user_id: i64, plan: PlanType) {
    subscriptions::grant(require_db(state).expect("db"), user_id, plan, None)
        .await
        .expect("grant plan");
}

fn city(name: &str, country: &str, code: &str, population: i64, ppi: f64) -> NewCity {
    serde_json::from_value(json!({
        "name": name,
        "country": country,
        "country_code": code,
        "population": population,
        "gdp_per_capita": 42_000.0,
        "purchasing_power_index": ppi,
        "ecommerce_penetration": 65.0,
        "competition_density": 45.0,
    }))
    .expect("valid city")
}

/// Four cities above the forecast population floor and one below it.
pub async fn seed_cities(state: &AppState) {
    let db = require_db(state).expect("db");
    let rows = [
        city("Berlin", "Germany", "DE", 3_600_000, 110.0),
        city("Lyon", "France", "FR", 520_000, 105.0),
        city("Porto", "Portugal", "PT", 230_000, 80.0),
        city("Ghent", "Belgium", "BE", 260_000, 100.0),
        city("Smallville", "Nowhere", "NW", 12_000, 150.0),
    ];
    for row in rows {
        cities::create(db, row).await.expect("seed city");
    }
}

pub fn product_body() -> Value {
    json!({
        "name": unique_str("Trail Bottle"),
        "description": "Insulated steel bottle",
        "category": "sports_outdoors",
        "base_price": 29.5,
        "production_method": "fason",
        "target_market": "Hikers",
    })
}

pub async fn create_product<S, B>(app: &S, user: &TestUser) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("{API}/products"))
        .insert_header(user.auth())
        .set_json(product_body())
        .to_request();
    let resp = send(app, req).await;
    assert_eq!(resp.status, StatusCode::CREATED, "create product failed: {:?}", resp.body);
    resp.json()["id"].as_i64().expect("product id")
}

/// POST a forecast for `product_id` and return the final JSON row.
pub async fn create_forecast<S, B>(app: &S, user: &TestUser, product_id: i64) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("{API}/forecasts/create"))
        .insert_header(user.auth())
        .set_json(json!({ "product_id": product_id }))
        .to_request();
    let resp = send(app, req).await;
    assert_eq!(resp.status, StatusCode::CREATED, "create forecast failed: {:?}", resp.body);
    resp.json()
}

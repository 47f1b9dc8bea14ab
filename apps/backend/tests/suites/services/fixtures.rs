use backend_test_support::unique_helpers::{unique_email, unique_str};
use commerce_intel::db::require_db;
use commerce_intel::repos::products::Product;
use commerce_intel::repos::users::User;
use commerce_intel::services::auth::{self, Registration};
use commerce_intel::services::products::{self, NewProduct};
use commerce_intel::state::app_state::AppState;
use serde_json::json;

use crate::support::factory::PASSWORD;

pub async fn user(state: &AppState) -> User {
    auth::register(
        require_db(state).expect("db"),
        Registration {
            email: unique_email("svc"),
            password: PASSWORD.to_string(),
            full_name: "Service User".to_string(),
            company_name: None,
        },
    )
    .await
    .expect("register")
}

pub async fn product(state: &AppState, user_id: i64) -> Product {
    let input: NewProduct = serde_json::from_value(json!({
        "name": unique_str("Desk Lamp"),
        "category": "home_garden",
        "base_price": 64.0,
        "quality_tier": "premium",
    }))
    .expect("valid product");
    products::create(require_db(state).expect("db"), user_id, input)
        .await
        .expect("create product")
}

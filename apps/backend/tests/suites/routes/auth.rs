use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::unique_helpers::unique_email;
use serde_json::json;

use crate::common::{bearer, send};
use crate::support::app_builder::create_test_app;
use crate::support::factory::{login, register_user, API, PASSWORD};
use crate::support::test_state::test_state;

fn register_req(email: &str, password: &str) -> actix_http::Request {
    test::TestRequest::post()
        .uri(&format!("{API}/auth/register"))
        .set_json(json!({
            "email": email,
            "password": password,
            "full_name": "Ada Lovelace",
            "company_name": "Analytical Engines",
        }))
        .to_request()
}

#[actix_web::test]
async fn register_returns_profile_without_secrets() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let email = unique_email("Ada");

    let resp = send(&app, register_req(&format!("  {}  ", email.to_uppercase()), PASSWORD)).await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let body = resp.json();
    assert_eq!(body["email"], email);
    assert_eq!(body["full_name"], "Ada Lovelace");
    assert_eq!(body["company_name"], "Analytical Engines");
    assert_eq!(body["role"], "user");
    assert_eq!(body["is_active"], true);
    assert!(body.get("password_hash").is_none());
    assert!(body.get("sub").is_none());
}

#[actix_web::test]
async fn duplicate_email_is_rejected() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let email = unique_email("dup");

    assert_eq!(send(&app, register_req(&email, PASSWORD)).await.status, StatusCode::CREATED);
    let resp = send(&app, register_req(&email, PASSWORD)).await;

    resp.assert_problem("EMAIL_ALREADY_REGISTERED", StatusCode::BAD_REQUEST, None);
}

#[actix_web::test]
async fn weak_passwords_are_rejected_with_the_missing_rule() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let cases = [
        ("Pass1", "at least 8 characters"),
        ("password123", "uppercase"),
        ("PASSWORD123", "lowercase"),
        ("Passwordxyz", "digit"),
    ];
    for (password, detail) in cases {
        let resp = send(&app, register_req(&unique_email("weak"), password)).await;
        resp.assert_problem("WEAK_PASSWORD", StatusCode::BAD_REQUEST, Some(detail));
    }
}

#[actix_web::test]
async fn malformed_email_is_rejected() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let resp = send(&app, register_req("not-an-email", PASSWORD)).await;

    resp.assert_problem("INVALID_EMAIL", StatusCode::BAD_REQUEST, None);
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/login"))
        .set_json(json!({ "email": user.email, "password": "Wrong12345" }))
        .to_request();
    let resp = send(&app, req).await;

    resp.assert_problem("INVALID_CREDENTIALS", StatusCode::UNAUTHORIZED, None);
}

#[actix_web::test]
async fn login_returns_bearer_pair() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let tokens = login(&app, &user.email, PASSWORD).await;

    assert_eq!(tokens["token_type"], "bearer");
    assert_eq!(tokens["expires_in"], 30 * 60);
    assert_ne!(tokens["access_token"], tokens["refresh_token"]);
}

#[actix_web::test]
async fn me_returns_the_authenticated_user() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/auth/me"))
        .insert_header(user.auth())
        .to_request();
    let resp = send(&app, req).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["id"], user.id);
    assert_eq!(body["email"], user.email);
    assert_eq!(body["login_count"], 1);
    assert!(body["last_login_at"].is_string());
}

#[actix_web::test]
async fn me_without_credentials_is_unauthorized() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri(&format!("{API}/auth/me")).to_request();
    let resp = send(&app, req).await;

    resp.assert_problem("UNAUTHORIZED_MISSING_BEARER", StatusCode::UNAUTHORIZED, None);
}

#[actix_web::test]
async fn me_rejects_garbage_and_refresh_tokens() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!("{API}/auth/me"))
        .insert_header(bearer("not.a.jwt"))
        .to_request();
    send(&app, req)
        .await
        .assert_problem("UNAUTHORIZED_INVALID_JWT", StatusCode::UNAUTHORIZED, None);

    let req = test::TestRequest::get()
        .uri(&format!("{API}/auth/me"))
        .insert_header(bearer(&user.refresh_token))
        .to_request();
    send(&app, req)
        .await
        .assert_problem("INVALID_TOKEN_TYPE", StatusCode::UNAUTHORIZED, None);
}

#[actix_web::test]
async fn refresh_exchanges_refresh_token_only() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/refresh"))
        .set_json(json!({ "refresh_token": user.refresh_token }))
        .to_request();
    let resp = send(&app, req).await;
    assert_eq!(resp.status, StatusCode::OK);
    let fresh = resp.json()["access_token"].as_str().expect("token").to_string();

    let req = test::TestRequest::get()
        .uri(&format!("{API}/auth/me"))
        .insert_header(bearer(&fresh))
        .to_request();
    assert_eq!(send(&app, req).await.status, StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/refresh"))
        .set_json(json!({ "refresh_token": user.access_token }))
        .to_request();
    send(&app, req)
        .await
        .assert_problem("INVALID_TOKEN_TYPE", StatusCode::UNAUTHORIZED, None);
}

#[actix_web::test]
async fn change_password_requires_current_and_takes_effect() {
    let app = create_test_app(test_state().await).with_prod_routes().build().await;
    let user = register_user(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/change-password"))
        .insert_header(user.auth())
        .set_json(json!({ "current_password": "Nope12345", "new_password": "NewPassword1" }))
        .to_request();
    send(&app, req)
        .await
        .assert_problem("INCORRECT_PASSWORD", StatusCode::BAD_REQUEST, None);

    let req = test::TestRequest::post()
        .uri(&format!("{API}/auth/change-password"))
        .insert_header(user.auth())
        .set_json(json!({ "current_password": PASSWORD, "new_password": "NewPassword1" }))
        .to_request();
    let resp = send(&app, req).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["message"], "Password updated successfully");

    let tokens = login(&app, &user.email, "NewPassword1").await;
    assert!(tokens["access_token"].is_string());
}

//! Auth gate and login issuer integration tests.

mod common;

use axum::http::{header, Method};
use backoffice_api::auth::TokenService;
use common::{response_json, TestApp, TEST_SECRET};
use serde_json::json;

#[tokio::test]
async fn admin_page_without_cookie_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/admin", None, None).await;

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin/login"
    );
}

#[tokio::test]
async fn login_page_is_not_gated() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/admin/login", None, None).await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn api_request_without_cookie_gets_401_json_not_a_redirect() {
    let app = TestApp::new().await;

    // Nested API paths must get the JSON error, never the login redirect.
    for path in ["/api/bookkeeping/accounts", "/api/sumup/test"] {
        let response = app.request(Method::GET, path, None, None).await;

        assert_eq!(response.status(), 401, "{path}");
        assert!(response.headers().get(header::LOCATION).is_none());
        let body = response_json(response).await;
        assert_eq!(body["error"], "Unauthorized");
    }
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'a' { 'b' } else { 'a' });

    let response = app
        .request(Method::GET, "/api/bookkeeping/accounts", None, Some(&tampered))
        .await;

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = TestApp::new().await;

    // Token minted with a zero lifetime against the app's real secret.
    let expired = TokenService::new(TEST_SECRET.to_string(), 0)
        .issue("admin")
        .expect("issue token");
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let cookie = format!("admin_token={expired}");

    let page = app.request(Method::GET, "/admin", None, Some(&cookie)).await;
    assert_eq!(page.status(), 303);

    let api = app
        .request(Method::GET, "/api/bookkeeping/accounts", None, Some(&cookie))
        .await;
    assert_eq!(api.status(), 401);
}

#[tokio::test]
async fn wrong_credentials_return_401_without_cookie() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "admin", "password": "wrong" })),
            None,
        )
        .await;

    assert_eq!(response.status(), 401);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn login_cookie_passes_the_gate_when_replayed() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    assert!(cookie.starts_with("admin_token="));

    let response = app
        .request(Method::GET, "/api/bookkeeping/accounts", None, Some(&cookie))
        .await;
    assert_eq!(response.status(), 200);

    let page = app.request(Method::GET, "/admin", None, Some(&cookie)).await;
    assert_eq!(page.status(), 200);
}

#[tokio::test]
async fn login_cookie_is_http_only_lax() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/login",
            Some(json!({ "username": "admin", "password": "hunter2" })),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    // Test environment counts as development, so no Secure attribute.
    assert!(!set_cookie.contains("Secure"));

    let body = response_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["expires_in"], 28_800);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
}

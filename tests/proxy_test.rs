//! External proxy integration tests against a mock upstream.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn ytj_proxy_relays_upstream_json_verbatim() {
    let upstream = MockServer::start().await;
    let company = json!({
        "totalResults": 1,
        "results": [{ "businessId": "1234567-8", "name": "Ink Studio Oy" }],
    });
    Mock::given(method("GET"))
        .and(query_param("name", "ink studio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(company.clone()))
        .mount(&upstream)
        .await;

    let app = TestApp::with_config(|cfg| {
        cfg.ytj_base_url = upstream.uri();
    })
    .await;
    let cookie = app.login().await;

    let response = app
        .request(
            Method::GET,
            "/api/bookkeeping/ytj?query=ink%20studio",
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await, company);
}

#[tokio::test]
async fn ytj_proxy_requires_a_query() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app
        .request(
            Method::GET,
            "/api/bookkeeping/ytj?query=%20",
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn ytj_proxy_maps_network_failure_to_error_object() {
    let app = TestApp::with_config(|cfg| {
        // Nothing listens here.
        cfg.ytj_base_url = "http://127.0.0.1:9".to_string();
    })
    .await;
    let cookie = app.login().await;

    let response = app
        .request(
            Method::GET,
            "/api/bookkeeping/ytj?query=ink",
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), 502);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Gateway");
}

#[tokio::test]
async fn sumup_proxy_forwards_bearer_credential() {
    let upstream = MockServer::start().await;
    let permissions = json!({ "payments": true, "refunds": false });
    Mock::given(method("GET"))
        .and(path("/permissions"))
        .and(bearer_token("sk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(permissions.clone()))
        .mount(&upstream)
        .await;

    let app = TestApp::with_config(|cfg| {
        cfg.sumup_base_url = upstream.uri();
        cfg.sumup_api_key = Some("sk_test_123".to_string());
    })
    .await;
    let cookie = app.login().await;

    let response = app
        .request(Method::GET, "/api/sumup/permissions", None, Some(&cookie))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await, permissions);
}

#[tokio::test]
async fn sumup_proxy_relays_upstream_error_status_and_body() {
    let upstream = MockServer::start().await;
    let error_body = json!({ "error_code": "NOT_AUTHORIZED", "message": "invalid key" });
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body.clone()))
        .mount(&upstream)
        .await;

    let app = TestApp::with_config(|cfg| {
        cfg.sumup_base_url = upstream.uri();
        cfg.sumup_api_key = Some("sk_bad".to_string());
    })
    .await;
    let cookie = app.login().await;

    let response = app
        .request(Method::GET, "/api/sumup/test", None, Some(&cookie))
        .await;

    assert_eq!(response.status(), 401);
    assert_eq!(response_json(response).await, error_body);
}

#[tokio::test]
async fn sumup_proxy_rejects_unknown_endpoint() {
    let app = TestApp::with_config(|cfg| {
        cfg.sumup_api_key = Some("sk_test".to_string());
    })
    .await;
    let cookie = app.login().await;

    let response = app
        .request(Method::GET, "/api/sumup/transactions", None, Some(&cookie))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn proxies_sit_behind_the_auth_gate() {
    let app = TestApp::new().await;

    let ytj = app
        .request(Method::GET, "/api/bookkeeping/ytj?query=ink", None, None)
        .await;
    assert_eq!(ytj.status(), 401);

    let sumup = app.request(Method::GET, "/api/sumup/test", None, None).await;
    assert_eq!(sumup.status(), 401);
}

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt;

use backoffice_api::{
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};

pub const TEST_SECRET: &str = "test_signing_secret_that_is_long_enough!";
pub const TEST_USER: &str = "admin";
pub const TEST_PASSWORD: &str = "hunter2";

/// Harness wrapping the full router over an in-memory SQLite database with
/// migrations applied.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Construct the app, letting the caller tweak the config first (used by
    /// the proxy tests to point upstream URLs at a mock server).
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_USER.to_string(),
            TEST_PASSWORD.to_string(),
            TEST_SECRET.to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        adjust(&mut cfg);

        // A single connection keeps every query on the same in-memory database.
        let db_cfg = DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            acquire_timeout: Duration::from_secs(5),
        };
        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("connect to test database");
        db::run_migrations(&pool).await.expect("run migrations");

        let state = AppState::new(cfg, Arc::new(pool));
        let router = backoffice_api::app_router(state.clone());
        Self { router, state }
    }

    /// Send one request through the router.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Log in with the configured admin credentials and return a Cookie
    /// header value carrying the admin token.
    pub async fn login(&self) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/login",
                Some(serde_json::json!({
                    "username": TEST_USER,
                    "password": TEST_PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(response.status(), 200, "login should succeed");

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login sets a cookie")
            .to_str()
            .expect("cookie header is ascii");

        // "admin_token=<jwt>; Path=/; ..." -> keep the name=value pair
        set_cookie
            .split(';')
            .next()
            .expect("cookie pair")
            .to_string()
    }
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

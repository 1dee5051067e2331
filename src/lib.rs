pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, response::Html, routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::{CredentialVerifier, StaticCredentials, TokenService};
use crate::config::AppConfig;
use crate::db::DbPool;

/// Shared application state: the connection pool, config, token service,
/// credential verifier and the outbound HTTP client.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub tokens: TokenService,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig, db: Arc<DbPool>) -> Self {
        let tokens = TokenService::new(config.jwt_secret.clone(), config.jwt_expiration_secs);
        let credentials = Arc::new(StaticCredentials::new(
            config.admin_username.clone(),
            config.admin_password.clone(),
        ));
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build outbound HTTP client");

        Self {
            db,
            config,
            tokens,
            credentials,
            http,
        }
    }
}

/// Placeholder admin shell; the real UI is served separately.
async fn admin_index() -> Html<&'static str> {
    Html("<!doctype html><title>Backoffice</title><p>backoffice admin</p>")
}

async fn login_page() -> Html<&'static str> {
    Html("<!doctype html><title>Login</title><p>admin login</p>")
}

/// Compose the full application router.
///
/// Everything under /api/bookkeeping and /api/sumup, and the /admin pages
/// except the login page, sit behind the auth gate.
pub fn app_router(state: AppState) -> Router {
    let bookkeeping = Router::new()
        .nest("/accounts", handlers::accounts::routes())
        .nest("/categories", handlers::categories::routes())
        .nest("/contacts", handlers::contacts::routes())
        .nest("/products", handlers::products::routes())
        .nest("/stock", handlers::stock::routes())
        .nest("/events", handlers::events::routes())
        .route("/usage", get(handlers::products::usage_listing))
        .route("/ytj", get(handlers::proxies::ytj_search));

    let sumup = Router::new().route("/:endpoint", get(handlers::proxies::sumup_proxy));

    let gated_api = Router::new()
        .nest("/bookkeeping", bookkeeping)
        .nest("/sumup", sumup)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_api_gate,
        ));

    let gated_pages = Router::new().route("/", get(admin_index)).layer(
        middleware::from_fn_with_state(state.clone(), auth::admin_page_gate),
    );
    let admin = Router::new()
        .route("/login", get(login_page))
        .merge(gated_pages);

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest(
            "/api",
            Router::new().merge(handlers::auth::routes()).merge(gated_api),
        )
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}

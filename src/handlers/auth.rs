use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{admin_cookie, clear_admin_cookie};
use crate::errors::ServiceError;
use crate::AppState;

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response; the token itself travels only in the cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub expires_in: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Validate the configured admin credentials and set the admin cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if !state
        .credentials
        .verify(&payload.username, &payload.password)
    {
        warn!(username = %payload.username, "login failed");
        return Err(ServiceError::Unauthorized(
            "invalid username or password".to_string(),
        ));
    }

    let token = state.tokens.issue(&payload.username)?;
    let expires_in = state.tokens.expiration_secs();
    let cookie = admin_cookie(token, state.config.cookie_secure(), expires_in as i64);

    info!(username = %payload.username, "admin logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            ok: true,
            expires_in,
        }),
    ))
}

/// Clear the admin cookie. The token itself stays valid until expiry; there
/// is no server-side revocation.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(clear_admin_cookie()),
        Json(serde_json::json!({ "ok": true })),
    )
}

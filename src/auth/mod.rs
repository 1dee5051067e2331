use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ServiceError;
use crate::AppState;

/// Name of the http-only cookie carrying the admin token.
pub const ADMIN_COOKIE: &str = "admin_token";

/// Path the auth gate redirects unauthenticated page requests to.
pub const LOGIN_PATH: &str = "/admin/login";

/// JWT claims embedded in the admin token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin username)
    pub sub: String,
    /// Fixed role claim
    pub role: String,
    /// Expiration time (unix seconds)
    pub exp: usize,
    /// Issued at (unix seconds)
    pub iat: usize,
}

/// Pluggable credential verification. The deployment ships exactly one
/// backing store (the configured admin username/password pair), but callers
/// only see this capability.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Credential store backed by two configured strings. Supports exactly one
/// admin identity; no lockout, no rate limiting.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// Stateless mint/verify for admin tokens. No revocation: a token stays
/// valid until its embedded expiry.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiration_secs: usize,
}

impl TokenService {
    pub fn new(secret: String, expiration_secs: usize) -> Self {
        Self {
            secret,
            expiration_secs,
        }
    }

    pub fn expiration_secs(&self) -> usize {
        self.expiration_secs
    }

    /// Mint a signed token asserting the admin role.
    pub fn issue(&self, username: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(self.expiration_secs as i64)).timestamp() as usize;

        let claims = Claims {
            sub: username.to_string(),
            role: "admin".to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("token encoding failed: {e}")))
    }

    /// Verify signature and expiry; returns the claims on success.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthorized("invalid or expired token".to_string()))
    }
}

/// Build the admin session cookie: http-only, SameSite=Lax, whole-site path,
/// Secure outside local development.
pub fn admin_cookie(token: String, secure: bool, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Expired replacement cookie used by logout.
pub fn clear_admin_cookie() -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build()
}

fn verify_admin_cookie(state: &AppState, jar: &CookieJar) -> Result<Claims, ServiceError> {
    let cookie = jar
        .get(ADMIN_COOKIE)
        .ok_or_else(|| ServiceError::Unauthorized("admin authentication required".to_string()))?;
    state.tokens.verify(cookie.value())
}

/// Auth gate for the admin API. A missing or unverifiable token yields a
/// 401 JSON error; a redirect is useless to a fetch caller.
pub async fn admin_api_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    match verify_admin_cookie(&state, &jar) {
        Ok(_) => next.run(req).await,
        Err(err) => {
            warn!(path = %req.uri().path(), "rejected admin API request: {}", err);
            ServiceError::Unauthorized("admin authentication required".to_string())
                .into_response()
        }
    }
}

/// Auth gate for the admin pages. A missing or unverifiable token redirects
/// the browser to the login page.
pub async fn admin_page_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    match verify_admin_cookie(&state, &jar) {
        Ok(_) => next.run(req).await,
        Err(err) => {
            warn!(path = %req.uri().path(), "redirecting admin page request to login: {}", err);
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit_test_secret_that_is_long_enough!!".into(), 3600)
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let svc = service();
        let token = svc.issue("admin").expect("issue");
        let claims = svc.verify(&token).expect("verify");
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let token = svc.issue("admin").expect("issue");
        let mut tampered = token.clone();
        // Flip a character in the signature segment.
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'a' { 'b' } else { 'a' });
        assert!(svc.verify(&tampered).is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = service().issue("admin").expect("issue");
        let other = TokenService::new("a_completely_different_secret_value!!!".into(), 3600);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = TokenService::new("unit_test_secret_that_is_long_enough!!".into(), 0);
        // exp == iat, and verification runs with zero leeway
        let token = svc.issue("admin").expect("issue");
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn static_credentials_exact_match_only() {
        let creds = StaticCredentials::new("admin".into(), "hunter2".into());
        assert!(creds.verify("admin", "hunter2"));
        assert!(!creds.verify("admin", "hunter3"));
        assert!(!creds.verify("Admin", "hunter2"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn admin_cookie_attributes() {
        let cookie = admin_cookie("tok".into(), true, 3600);
        assert_eq!(cookie.name(), ADMIN_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}

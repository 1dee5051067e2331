//! Thin pass-throughs to third-party HTTP APIs. The upstream JSON body is
//! relayed verbatim with the upstream status; only a transport failure is
//! converted into a local error object.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::error;

use crate::errors::ServiceError;
use crate::AppState;

/// Payments API endpoints the proxy will forward to.
const SUMUP_ENDPOINTS: &[&str] = &["permissions", "products", "test"];

#[derive(Debug, Deserialize)]
pub struct YtjQuery {
    pub query: String,
}

/// Business-registry company search, mounted at GET /api/bookkeeping/ytj.
pub async fn ytj_search(
    State(state): State<AppState>,
    Query(params): Query<YtjQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    if params.query.trim().is_empty() {
        return Err(ServiceError::BadRequest(
            "query parameter is required".to_string(),
        ));
    }

    let response = state
        .http
        .get(&state.config.ytj_base_url)
        .query(&[("name", params.query.as_str())])
        .send()
        .await
        .map_err(|e| {
            error!("business registry request failed: {}", e);
            ServiceError::ExternalApiError("business registry unreachable".to_string())
        })?;

    relay_json(response).await
}

/// Payments API pass-through with the configured bearer credential, mounted
/// at GET /api/sumup/:endpoint.
pub async fn sumup_proxy(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    if !SUMUP_ENDPOINTS.contains(&endpoint.as_str()) {
        return Err(ServiceError::NotFound(format!(
            "unknown payments endpoint '{endpoint}'"
        )));
    }

    let api_key = state
        .config
        .sumup_api_key
        .as_deref()
        .ok_or_else(|| ServiceError::InternalError("payments API key not configured".into()))?;

    let url = format!("{}/{}", state.config.sumup_base_url, endpoint);
    let response = state
        .http
        .get(&url)
        .bearer_auth(api_key)
        .send()
        .await
        .map_err(|e| {
            error!("payments API request failed: {}", e);
            ServiceError::ExternalApiError("payments API unreachable".to_string())
        })?;

    relay_json(response).await
}

/// Forward the upstream JSON body unchanged, keeping the upstream status.
async fn relay_json(response: reqwest::Response) -> Result<impl IntoResponse, ServiceError> {
    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = response.json().await.map_err(|e| {
        error!("upstream returned a non-JSON body: {}", e);
        ServiceError::ExternalApiError("invalid response from upstream".to_string())
    })?;

    Ok((status, Json(body)))
}

use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::{created_response, success_response};
use crate::entities::{product, stock_movement};
use crate::errors::ServiceError;
use crate::services::stock;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub product_id: i32,
    pub change: i32,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MovementListParams {
    #[serde(default)]
    pub product_id: Option<i32>,
}

/// Movement plus the product state it produced.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    pub movement: stock_movement::Model,
    pub product: product::Model,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_movements).post(create_movement))
}

async fn list_movements(
    State(state): State<AppState>,
    Query(params): Query<MovementListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let movements = stock::list_movements(&state.db, params.product_id).await?;
    Ok(success_response(movements))
}

async fn create_movement(
    State(state): State<AppState>,
    Json(payload): Json<MovementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (movement, product) =
        stock::record_movement(&state.db, payload.product_id, payload.change, payload.note).await?;
    Ok(created_response(MovementResponse { movement, product }))
}

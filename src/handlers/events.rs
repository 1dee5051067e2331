use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::{created_response, no_content_response, success_response};
use crate::errors::ServiceError;
use crate::services::ledger::{self, EntryInput};
use crate::AppState;

/// Update payload: the entry id plus the full replacement state, including
/// the complete `usages` array.
#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub id: i32,
    #[serde(flatten)]
    pub entry: EntryInput,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/update", post(update_entry))
        .route("/:id", get(get_entry).delete(delete_entry))
}

async fn list_entries(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let entries = ledger::list_entries(&state.db).await?;
    Ok(success_response(entries))
}

async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let entry = ledger::get_entry(&state.db, id).await?;
    Ok(success_response(entry))
}

async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<EntryInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = ledger::create_entry(&state.db, payload).await?;
    Ok(created_response(created))
}

async fn update_entry(
    State(state): State<AppState>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = ledger::update_entry(&state.db, payload.id, payload.entry).await?;
    Ok(success_response(updated))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    ledger::delete_entry(&state.db, id).await?;
    Ok(no_content_response())
}

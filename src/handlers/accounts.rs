use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde::Deserialize;

use super::{created_response, no_content_response, success_response};
use crate::entities::account;
use crate::errors::ServiceError;
use crate::AppState;

/// Create/update payload. Unknown body fields are ignored.
#[derive(Debug, Deserialize)]
pub struct AccountPayload {
    pub name: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/:id", put(update_account).delete(delete_account))
}

async fn list_accounts(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let accounts = account::Entity::find().all(&*state.db).await?;
    Ok(success_response(accounts))
}

async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<AccountPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = account::ActiveModel {
        name: Set(payload.name),
        number: Set(payload.number),
        description: Set(payload.description),
        ..Default::default()
    }
    .insert(&*state.db)
    .await?;
    Ok(created_response(created))
}

async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AccountPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let existing = account::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("account {id} not found")))?;

    let mut active: account::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.number = Set(payload.number);
    active.description = Set(payload.description);
    let updated = active.update(&*state.db).await?;

    Ok(success_response(updated))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let res = account::Entity::delete_by_id(id).exec(&*state.db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!("account {id} not found")));
    }
    Ok(no_content_response())
}

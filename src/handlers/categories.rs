use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde::Deserialize;

use super::{created_response, no_content_response, success_response};
use crate::entities::category;
use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub default_vat: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
}

async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let categories = category::Entity::find().all(&*state.db).await?;
    Ok(success_response(categories))
}

async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = category::ActiveModel {
        name: Set(payload.name),
        kind: Set(payload.kind),
        default_vat: Set(payload.default_vat),
        description: Set(payload.description),
        ..Default::default()
    }
    .insert(&*state.db)
    .await?;
    Ok(created_response(created))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let existing = category::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("category {id} not found")))?;

    let mut active: category::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.kind = Set(payload.kind);
    active.default_vat = Set(payload.default_vat);
    active.description = Set(payload.description);
    let updated = active.update(&*state.db).await?;

    Ok(success_response(updated))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    // No dependent-row guard: deleting a category referenced by entries
    // surfaces as a foreign-key constraint error from the database.
    let res = category::Entity::delete_by_id(id).exec(&*state.db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!("category {id} not found")));
    }
    Ok(no_content_response())
}

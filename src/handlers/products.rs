use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, patch, put},
    Router,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use validator::Validate;

use super::{created_response, no_content_response, success_response};
use crate::entities::product;
use crate::errors::ServiceError;
use crate::AppState;

/// Create/update payload. Quantity is deliberately absent: stock levels
/// change only through stock movements.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct UsageListingParams {
    #[serde(rename = "type")]
    pub kind: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
        .route("/:id/archive", patch(archive_product))
        .route("/:id/unarchive", patch(unarchive_product))
}

async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let products = product::Entity::find().all(&*state.db).await?;
    Ok(success_response(products))
}

/// Active products of one category, for the usage picker.
/// Mounted at GET /api/bookkeeping/usage?type=.
pub async fn usage_listing(
    State(state): State<AppState>,
    Query(params): Query<UsageListingParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = product::Entity::find()
        .filter(product::Column::Category.eq(params.kind))
        .filter(product::Column::Archived.eq(false))
        .all(&*state.db)
        .await?;
    Ok(success_response(products))
}

async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let created = product::ActiveModel {
        name: Set(payload.name),
        category: Set(payload.category),
        quantity: Set(0),
        archived: Set(false),
        ..Default::default()
    }
    .insert(&*state.db)
    .await?;
    Ok(created_response(created))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let existing = product::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("product {id} not found")))?;

    let mut active: product::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.category = Set(payload.category);
    let updated = active.update(&*state.db).await?;

    Ok(success_response(updated))
}

async fn set_archived(
    state: &AppState,
    id: i32,
    archived: bool,
) -> Result<product::Model, ServiceError> {
    let existing = product::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("product {id} not found")))?;

    let mut active: product::ActiveModel = existing.into();
    active.archived = Set(archived);
    Ok(active.update(&*state.db).await?)
}

async fn archive_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(set_archived(&state, id, true).await?))
}

async fn unarchive_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(set_archived(&state, id, false).await?))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let res = product::Entity::delete_by_id(id).exec(&*state.db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!("product {id} not found")));
    }
    Ok(no_content_response())
}

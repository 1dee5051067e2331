use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use serde::Deserialize;

use super::{created_response, no_content_response, success_response};
use crate::entities::contact;
use crate::errors::ServiceError;
use crate::AppState;

/// Optional fields absent from the payload are stored as NULL.
#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route("/:id", put(update_contact).delete(delete_contact))
}

async fn list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let contacts = contact::Entity::find().all(&*state.db).await?;
    Ok(success_response(contacts))
}

async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = contact::ActiveModel {
        name: Set(payload.name),
        email: Set(payload.email),
        address: Set(payload.address),
        zip: Set(payload.zip),
        city: Set(payload.city),
        notes: Set(payload.notes),
        ..Default::default()
    }
    .insert(&*state.db)
    .await?;
    Ok(created_response(created))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let existing = contact::Entity::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("contact {id} not found")))?;

    let mut active: contact::ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.email = Set(payload.email);
    active.address = Set(payload.address);
    active.zip = Set(payload.zip);
    active.city = Set(payload.city);
    active.notes = Set(payload.notes);
    let updated = active.update(&*state.db).await?;

    Ok(success_response(updated))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let res = contact::Entity::delete_by_id(id).exec(&*state.db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!("contact {id} not found")));
    }
    Ok(no_content_response())
}

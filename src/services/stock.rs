//! Stock movement recording.
//!
//! A movement and the matching product quantity change commit in a single
//! transaction; a failure at either step rolls back both.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionError, TransactionTrait,
};
use tracing::info;

use crate::db::DbPool;
use crate::entities::{product, stock_movement};
use crate::errors::ServiceError;

fn unwrap_txn_err(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(e) => ServiceError::DatabaseError(e),
        TransactionError::Transaction(e) => e,
    }
}

/// Insert a movement row and apply its signed change to the product
/// quantity. Returns the movement together with the updated product.
pub async fn record_movement(
    db: &DbPool,
    product_id: i32,
    change: i32,
    note: Option<String>,
) -> Result<(stock_movement::Model, product::Model), ServiceError> {
    if change == 0 {
        return Err(ServiceError::ValidationError(
            "change must be a non-zero integer".to_string(),
        ));
    }

    let result = db
        .transaction::<_, (stock_movement::Model, product::Model), ServiceError>(|txn| {
            Box::pin(async move {
                let existing = product::Entity::find_by_id(product_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("product {product_id} not found"))
                    })?;

                let movement = stock_movement::ActiveModel {
                    product_id: Set(product_id),
                    change: Set(change),
                    note: Set(note),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let new_quantity = existing.quantity + change;
                let mut active: product::ActiveModel = existing.into();
                active.quantity = Set(new_quantity);
                let updated = active.update(txn).await?;

                Ok((movement, updated))
            })
        })
        .await
        .map_err(unwrap_txn_err)?;

    info!(
        product_id,
        change,
        quantity = result.1.quantity,
        "recorded stock movement"
    );
    Ok(result)
}

/// Movement log for a product (newest first), or the whole log when no
/// product filter is given.
pub async fn list_movements(
    db: &DbPool,
    product_id: Option<i32>,
) -> Result<Vec<stock_movement::Model>, ServiceError> {
    let mut query =
        stock_movement::Entity::find().order_by_desc(stock_movement::Column::CreatedAt);
    if let Some(pid) = product_id {
        query = query.filter(stock_movement::Column::ProductId.eq(pid));
    }
    Ok(query.all(db).await?)
}

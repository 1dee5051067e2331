//! Ledger entry ("event") persistence.
//!
//! Entry mutations and their usage-line replacement run in one transaction:
//! an update either lands with exactly the requested usage rows or not at
//! all. Usage rows are always replaced wholesale, never patched.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::DbPool;
use crate::entities::{ledger_entry, product_usage};
use crate::errors::ServiceError;

/// One usage line in a create/update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageItem {
    pub product_id: i32,
    pub quantity: i32,
}

/// Fields shared by entry create and update payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryInput {
    pub entry_date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub vat_rate: Decimal,
    pub payment_method: String,
    pub category_id: i32,
    #[serde(default)]
    pub contact_id: Option<i32>,
    #[serde(default)]
    pub usages: Vec<UsageItem>,
}

/// Entry with its usage lines, as returned to callers.
#[derive(Debug, Serialize)]
pub struct EntryWithUsages {
    #[serde(flatten)]
    pub entry: ledger_entry::Model,
    pub usages: Vec<product_usage::Model>,
}

fn unwrap_txn_err(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(e) => ServiceError::DatabaseError(e),
        TransactionError::Transaction(e) => e,
    }
}

async fn insert_usages(
    txn: &DatabaseTransaction,
    entry_id: i32,
    usages: &[UsageItem],
) -> Result<Vec<product_usage::Model>, ServiceError> {
    let mut rows = Vec::with_capacity(usages.len());
    for usage in usages {
        let row = product_usage::ActiveModel {
            entry_id: Set(entry_id),
            product_id: Set(usage.product_id),
            quantity: Set(usage.quantity),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        rows.push(row);
    }
    Ok(rows)
}

pub async fn create_entry(db: &DbPool, input: EntryInput) -> Result<EntryWithUsages, ServiceError> {
    let result = db
        .transaction::<_, EntryWithUsages, ServiceError>(|txn| {
            Box::pin(async move {
                let now = Utc::now();
                let entry = ledger_entry::ActiveModel {
                    entry_date: Set(input.entry_date),
                    description: Set(input.description.clone()),
                    amount: Set(input.amount),
                    vat_rate: Set(input.vat_rate),
                    payment_method: Set(input.payment_method.clone()),
                    category_id: Set(input.category_id),
                    contact_id: Set(input.contact_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let usages = insert_usages(txn, entry.id, &input.usages).await?;
                Ok(EntryWithUsages { entry, usages })
            })
        })
        .await
        .map_err(unwrap_txn_err)?;

    info!(entry_id = result.entry.id, "created ledger entry");
    Ok(result)
}

/// Update an entry and replace all of its usage rows with the ones in the
/// payload (delete-all then reinsert, in the same transaction).
pub async fn update_entry(
    db: &DbPool,
    id: i32,
    input: EntryInput,
) -> Result<EntryWithUsages, ServiceError> {
    let result = db
        .transaction::<_, EntryWithUsages, ServiceError>(|txn| {
            Box::pin(async move {
                let existing = ledger_entry::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("entry {id} not found")))?;

                let mut active: ledger_entry::ActiveModel = existing.into();
                active.entry_date = Set(input.entry_date);
                active.description = Set(input.description.clone());
                active.amount = Set(input.amount);
                active.vat_rate = Set(input.vat_rate);
                active.payment_method = Set(input.payment_method.clone());
                active.category_id = Set(input.category_id);
                active.contact_id = Set(input.contact_id);
                active.updated_at = Set(Utc::now());
                let entry = active.update(txn).await?;

                product_usage::Entity::delete_many()
                    .filter(product_usage::Column::EntryId.eq(id))
                    .exec(txn)
                    .await?;

                let usages = insert_usages(txn, id, &input.usages).await?;
                Ok(EntryWithUsages { entry, usages })
            })
        })
        .await
        .map_err(unwrap_txn_err)?;

    info!(
        entry_id = id,
        usage_count = result.usages.len(),
        "updated ledger entry"
    );
    Ok(result)
}

pub async fn delete_entry(db: &DbPool, id: i32) -> Result<(), ServiceError> {
    // Usage rows cascade with the entry.
    let res = ledger_entry::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!("entry {id} not found")));
    }
    info!(entry_id = id, "deleted ledger entry");
    Ok(())
}

pub async fn get_entry(db: &DbPool, id: i32) -> Result<EntryWithUsages, ServiceError> {
    let entry = ledger_entry::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("entry {id} not found")))?;

    let usages = product_usage::Entity::find()
        .filter(product_usage::Column::EntryId.eq(id))
        .all(db)
        .await?;

    Ok(EntryWithUsages { entry, usages })
}

/// All entries with their usage lines, newest entry date first.
pub async fn list_entries(db: &DbPool) -> Result<Vec<EntryWithUsages>, ServiceError> {
    let entries = ledger_entry::Entity::find()
        .order_by_desc(ledger_entry::Column::EntryDate)
        .find_with_related(product_usage::Entity)
        .all(db)
        .await?;

    Ok(entries
        .into_iter()
        .map(|(entry, usages)| EntryWithUsages { entry, usages })
        .collect())
}

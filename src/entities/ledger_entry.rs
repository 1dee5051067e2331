use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bookkeeping transaction record ("event"). Product consumption is tracked
/// through child `product_usage` rows, which are replaced wholesale on update.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub entry_date: NaiveDate,

    pub description: String,

    pub amount: Decimal,

    /// VAT rate as a percentage (e.g. 25.5)
    pub vat_rate: Decimal,

    /// Free-form payment method label ("cash", "card", "invoice", ...)
    pub payment_method: String,

    pub category_id: i32,

    pub contact_id: Option<i32>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::contact::Entity",
        from = "Column::ContactId",
        to = "super::contact::Column::Id"
    )]
    Contact,
    #[sea_orm(has_many = "super::product_usage::Entity")]
    ProductUsages,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl Related<super::product_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductUsages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product / supply item.
///
/// `quantity` is never written directly by product handlers; it changes only
/// as a side effect of recording a stock movement. Products are archived
/// rather than deleted once they have movement or usage history.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Product name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Free-form category label, matched by the usage listing filter
    #[validate(length(min = 1, max = 100))]
    pub category: String,

    /// Current stock level
    pub quantity: i32,

    /// Archived products are hidden from the usage listing
    pub archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovements,
    #[sea_orm(has_many = "super::product_usage::Entity")]
    ProductUsages,
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

impl Related<super::product_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductUsages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

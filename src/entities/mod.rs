pub mod account;
pub mod category;
pub mod contact;
pub mod ledger_entry;
pub mod product;
pub mod product_usage;
pub mod stock_movement;

pub mod ledger;
pub mod stock;

pub mod ledger_csv;
pub mod property_store;

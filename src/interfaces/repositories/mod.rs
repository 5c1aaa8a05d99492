pub mod assessment;
pub mod file_store;
pub mod kv_store;
pub mod ledger;
pub mod redis_store;
pub mod session;

pub mod assessment;
pub mod extractors;
pub mod ledger;
pub mod session;

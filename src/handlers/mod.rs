pub mod general;
pub mod ledger;
pub mod masterdata;
pub mod rates;
pub mod sheets;

mod auth_service;
mod ledger_service;

pub use auth_service::*;
pub use ledger_service::*;

mod auth_service_impl;
mod ledger_service_impl;

pub use auth_service_impl::*;
pub use ledger_service_impl::*;

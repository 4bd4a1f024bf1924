mod borrower_repo_sqlite;
mod credential_repo_sqlite;
mod loan_repo_sqlite;
mod payment_repo_sqlite;

pub use borrower_repo_sqlite::*;
pub use credential_repo_sqlite::*;
pub use loan_repo_sqlite::*;
pub use payment_repo_sqlite::*;

mod repo_tx_sqlite;

pub use repo_tx_sqlite::*;

mod schema;
mod store;

pub use schema::*;
pub use store::*;

mod util;

mod borrower_repo;
mod credential_repo;
mod loan_repo;
mod payment_repo;

mod repo_tx;

pub use borrower_repo::*;
pub use credential_repo::*;
pub use loan_repo::*;
pub use payment_repo::*;

pub use repo_tx::*;

use crate::application_port::{LedgerError, NewBorrower};
use crate::domain_model::BorrowerId;

#[derive(Debug, Clone)]
pub struct BorrowerRecord {
    pub borrower_id: BorrowerId,
    pub full_name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
}

#[async_trait::async_trait]
pub trait BorrowerRepo: Send + Sync {
    async fn insert(&self, input: &NewBorrower) -> Result<BorrowerId, LedgerError>;

    /// All borrowers in insertion order.
    async fn list(&self) -> Result<Vec<BorrowerRecord>, LedgerError>;

    /// Substring match against full name and id-document number.
    async fn search(&self, query: &str) -> Result<Vec<BorrowerRecord>, LedgerError>;

    /// Exact full-name lookup, used by the UI's name dropdowns.
    async fn get_by_name(&self, full_name: &str) -> Result<Option<BorrowerRecord>, LedgerError>;

    async fn list_names(&self) -> Result<Vec<String>, LedgerError>;
}

use crate::application_port::{LedgerError, NewLoan, StatusCount};
use crate::domain_model::{BorrowerId, LoanId, LoanStatus};
use crate::domain_port::repo_tx::StorageTx;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct LoanRecord {
    pub loan_id: LoanId,
    pub borrower_id: BorrowerId,
    pub amount: f64,
    pub interest_rate: f64,
    pub term_months: i64,
    pub start_date: NaiveDate,
    pub status: LoanStatus,
}

/// One row of the loan-borrower join, the shape the loan lists, search and
/// the CSV report all use.
#[derive(Debug, Clone)]
pub struct LoanWithBorrower {
    pub loan_id: LoanId,
    pub full_name: String,
    pub amount: f64,
    pub interest_rate: f64,
    pub term_months: i64,
    pub start_date: NaiveDate,
    pub status: LoanStatus,
}

#[async_trait::async_trait]
pub trait LoanRepo: Send + Sync {
    async fn insert(&self, input: &NewLoan, status: LoanStatus) -> Result<LoanId, LedgerError>;

    async fn get(&self, loan_id: LoanId) -> Result<Option<LoanRecord>, LedgerError>;

    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        loan_id: LoanId,
    ) -> Result<Option<LoanRecord>, LedgerError>;

    async fn set_status_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        loan_id: LoanId,
        status: LoanStatus,
    ) -> Result<(), LedgerError>;

    async fn list_with_borrowers(&self) -> Result<Vec<LoanWithBorrower>, LedgerError>;

    /// Substring match against borrower name and loan id.
    async fn search_with_borrowers(&self, query: &str)
    -> Result<Vec<LoanWithBorrower>, LedgerError>;

    async fn count_all(&self) -> Result<i64, LedgerError>;

    /// Sum of all principals, 0 when there are no loans.
    async fn total_amount(&self) -> Result<f64, LedgerError>;

    async fn count_with_status(&self, status: LoanStatus) -> Result<i64, LedgerError>;

    async fn status_breakdown(&self) -> Result<Vec<StatusCount>, LedgerError>;

    /// Every loan principal, insertion order. Feeds the dashboard histogram.
    async fn list_amounts(&self) -> Result<Vec<f64>, LedgerError>;
}

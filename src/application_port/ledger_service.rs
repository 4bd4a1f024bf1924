use crate::domain_model::*;
use crate::domain_port::{BorrowerRecord, LoanRecord, LoanWithBorrower, PaymentRecord};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The store refused the write on an integrity constraint. The caller is
    /// not told which constraint; one user-facing message covers all of them.
    #[error("rejected by the store")]
    Rejected,
    #[error("loan not found")]
    LoanNotFound,
    #[error("report error: {0}")]
    Report(String),
    #[error("store error: {0}")]
    Store(String),
}

/// Borrower fields as entered in the UI form. Field-level validation (required
/// name, id number implying id type) happens on the caller's side.
#[derive(Debug, Clone)]
pub struct NewBorrower {
    pub full_name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLoan {
    pub borrower_id: BorrowerId,
    pub amount: f64,
    pub interest_rate: f64,
    pub term_months: i64,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: LoanStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub total_loans: i64,
    /// Sum of principals, not of outstanding balances.
    pub total_amount: f64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    pub status_breakdown: Vec<StatusCount>,
    pub amounts: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LoanSummary {
    pub loan: LoanRecord,
    pub payments: Vec<PaymentRecord>,
}

#[async_trait::async_trait]
pub trait LedgerService: Send + Sync {
    async fn add_borrower(&self, input: NewBorrower) -> Result<BorrowerId, LedgerError>;

    /// Inserts the loan with status fixed to `Active`.
    async fn add_loan(&self, input: NewLoan) -> Result<LoanId, LedgerError>;

    /// Records a payment and returns the new balance. The balance snapshot,
    /// the payment row and the recomputed status are committed as one unit.
    /// A payment above the remaining balance is accepted and leaves a
    /// negative snapshot.
    async fn record_payment(
        &self,
        loan_id: LoanId,
        amount: f64,
        payment_date: NaiveDate,
    ) -> Result<f64, LedgerError>;

    async fn get_dashboard_data(&self) -> Result<DashboardSnapshot, LedgerError>;

    async fn get_all_borrowers(&self) -> Result<Vec<BorrowerRecord>, LedgerError>;

    async fn get_all_loans(&self) -> Result<Vec<LoanWithBorrower>, LedgerError>;

    /// Substring match against borrower name and id-document number.
    async fn search_borrowers(&self, query: &str) -> Result<Vec<BorrowerRecord>, LedgerError>;

    /// Substring match against borrower name and loan id.
    async fn search_loans(&self, query: &str) -> Result<Vec<LoanWithBorrower>, LedgerError>;

    async fn get_borrower_by_name(
        &self,
        full_name: &str,
    ) -> Result<Option<BorrowerRecord>, LedgerError>;

    async fn get_borrower_names(&self) -> Result<Vec<String>, LedgerError>;

    /// Principal minus the sum of all recorded payments. Derived on read,
    /// never stored.
    async fn get_loan_balance(&self, loan_id: LoanId) -> Result<f64, LedgerError>;

    async fn get_loan_summary(&self, loan_id: LoanId) -> Result<LoanSummary, LedgerError>;

    /// Writes the loan-borrower join as CSV to the configured report path and
    /// returns the number of data rows written.
    async fn export_loan_report(&self) -> Result<usize, LedgerError>;
}

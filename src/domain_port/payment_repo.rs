use crate::application_port::LedgerError;
use crate::domain_model::{LoanId, PaymentId};
use crate::domain_port::repo_tx::StorageTx;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub payment_id: PaymentId,
    pub loan_id: LoanId,
    pub amount: f64,
    pub payment_date: NaiveDate,
    /// Balance snapshot taken when the payment was inserted. Negative when
    /// the payment exceeded the remaining balance.
    pub balance_after_payment: f64,
}

/// Payments are append-only; there is no update or delete.
#[async_trait::async_trait]
pub trait PaymentRepo: Send + Sync {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        loan_id: LoanId,
        amount: f64,
        payment_date: NaiveDate,
        balance_after_payment: f64,
    ) -> Result<PaymentId, LedgerError>;

    async fn sum_for_loan_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        loan_id: LoanId,
    ) -> Result<f64, LedgerError>;

    async fn sum_for_loan(&self, loan_id: LoanId) -> Result<f64, LedgerError>;

    async fn list_for_loan(&self, loan_id: LoanId) -> Result<Vec<PaymentRecord>, LedgerError>;
}

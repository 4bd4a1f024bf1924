use crate::application_port::{
    DashboardSnapshot, LedgerError, LedgerService, LoanSummary, NewBorrower, NewLoan,
};
use crate::domain_model::{BorrowerId, LoanId, LoanStatus};
use crate::domain_port::{BorrowerRecord, BorrowerRepo, LoanRepo, LoanWithBorrower, PaymentRepo, TxManager};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct RealLedgerService {
    borrower_repo: Arc<dyn BorrowerRepo>,
    loan_repo: Arc<dyn LoanRepo>,
    payment_repo: Arc<dyn PaymentRepo>,
    tx_manager: Arc<dyn TxManager>,
    report_path: PathBuf,
}

impl RealLedgerService {
    pub fn new(
        borrower_repo: Arc<dyn BorrowerRepo>,
        loan_repo: Arc<dyn LoanRepo>,
        payment_repo: Arc<dyn PaymentRepo>,
        tx_manager: Arc<dyn TxManager>,
        report_path: PathBuf,
    ) -> Self {
        Self {
            borrower_repo,
            loan_repo,
            payment_repo,
            tx_manager,
            report_path,
        }
    }

    fn csv_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    fn report_line(row: &LoanWithBorrower) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            row.loan_id,
            Self::csv_field(&row.full_name),
            row.amount,
            row.interest_rate,
            row.term_months,
            row.start_date.format("%Y-%m-%d"),
            row.status
        )
    }
}

#[async_trait::async_trait]
impl LedgerService for RealLedgerService {
    async fn add_borrower(&self, input: NewBorrower) -> Result<BorrowerId, LedgerError> {
        let borrower_id = self.borrower_repo.insert(&input).await?;
        info!(%borrower_id, "borrower added");
        Ok(borrower_id)
    }

    async fn add_loan(&self, input: NewLoan) -> Result<LoanId, LedgerError> {
        let loan_id = self.loan_repo.insert(&input, LoanStatus::Active).await?;
        info!(%loan_id, borrower_id = %input.borrower_id, amount = input.amount, "loan added");
        Ok(loan_id)
    }

    async fn record_payment(
        &self,
        loan_id: LoanId,
        amount: f64,
        payment_date: NaiveDate,
    ) -> Result<f64, LedgerError> {
        // lookup, snapshot, insert and status update land as ONE tx; dropping
        // the tx on any early return rolls everything back
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;

        let loan = self
            .loan_repo
            .get_in_tx(&mut *tx, loan_id)
            .await?
            .ok_or(LedgerError::LoanNotFound)?;

        let total_paid = self.payment_repo.sum_for_loan_in_tx(&mut *tx, loan_id).await?;
        // not floored at zero: an overpayment leaves a negative snapshot
        let new_balance = loan.amount - total_paid - amount;

        self.payment_repo
            .insert_in_tx(&mut *tx, loan_id, amount, payment_date, new_balance)
            .await?;

        let today = Local::now().date_naive();
        let status = LoanStatus::derive(new_balance, loan.start_date, today);
        self.loan_repo
            .set_status_in_tx(&mut *tx, loan_id, status)
            .await?;

        tx.commit()
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;

        info!(%loan_id, amount, new_balance, status = %status, "payment recorded");
        Ok(new_balance)
    }

    async fn get_dashboard_data(&self) -> Result<DashboardSnapshot, LedgerError> {
        Ok(DashboardSnapshot {
            total_loans: self.loan_repo.count_all().await?,
            total_amount: self.loan_repo.total_amount().await?,
            active_loans: self.loan_repo.count_with_status(LoanStatus::Active).await?,
            overdue_loans: self
                .loan_repo
                .count_with_status(LoanStatus::Overdue)
                .await?,
            status_breakdown: self.loan_repo.status_breakdown().await?,
            amounts: self.loan_repo.list_amounts().await?,
        })
    }

    async fn get_all_borrowers(&self) -> Result<Vec<BorrowerRecord>, LedgerError> {
        self.borrower_repo.list().await
    }

    async fn get_all_loans(&self) -> Result<Vec<LoanWithBorrower>, LedgerError> {
        self.loan_repo.list_with_borrowers().await
    }

    async fn search_borrowers(&self, query: &str) -> Result<Vec<BorrowerRecord>, LedgerError> {
        self.borrower_repo.search(query).await
    }

    async fn search_loans(&self, query: &str) -> Result<Vec<LoanWithBorrower>, LedgerError> {
        self.loan_repo.search_with_borrowers(query).await
    }

    async fn get_borrower_by_name(
        &self,
        full_name: &str,
    ) -> Result<Option<BorrowerRecord>, LedgerError> {
        self.borrower_repo.get_by_name(full_name).await
    }

    async fn get_borrower_names(&self) -> Result<Vec<String>, LedgerError> {
        self.borrower_repo.list_names().await
    }

    async fn get_loan_balance(&self, loan_id: LoanId) -> Result<f64, LedgerError> {
        let loan = self
            .loan_repo
            .get(loan_id)
            .await?
            .ok_or(LedgerError::LoanNotFound)?;
        let total_paid = self.payment_repo.sum_for_loan(loan_id).await?;
        Ok(loan.amount - total_paid)
    }

    async fn get_loan_summary(&self, loan_id: LoanId) -> Result<LoanSummary, LedgerError> {
        let loan = self
            .loan_repo
            .get(loan_id)
            .await?
            .ok_or(LedgerError::LoanNotFound)?;
        let payments = self.payment_repo.list_for_loan(loan_id).await?;
        Ok(LoanSummary { loan, payments })
    }

    async fn export_loan_report(&self) -> Result<usize, LedgerError> {
        let rows = self.loan_repo.list_with_borrowers().await?;

        let mut out =
            String::from("loan_id,full_name,amount,interest_rate,term_months,start_date,status\n");
        for row in &rows {
            out.push_str(&Self::report_line(row));
            out.push('\n');
        }

        tokio::fs::write(&self.report_path, out)
            .await
            .map_err(|e| LedgerError::Report(format!("write {:?}: {}", self.report_path, e)))?;

        info!(rows = rows.len(), path = ?self.report_path, "loan report exported");
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::{LoanId, LoanStatus};

    #[test]
    fn report_line_quotes_only_when_needed() {
        let row = LoanWithBorrower {
            loan_id: LoanId(7),
            full_name: "Dela Cruz, Juan".to_string(),
            amount: 1500.0,
            interest_rate: 5.5,
            term_months: 12,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            status: LoanStatus::Active,
        };

        assert_eq!(
            RealLedgerService::report_line(&row),
            "7,\"Dela Cruz, Juan\",1500,5.5,12,2025-03-01,Active"
        );
    }
}

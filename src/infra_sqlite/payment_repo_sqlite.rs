use super::util::{classify_write_err, downcast};
use crate::application_port::LedgerError;
use crate::domain_model::{LoanId, PaymentId};
use crate::domain_port::{PaymentRecord, PaymentRepo, StorageTx};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub struct SqlitePaymentRepo {
    pool: SqlitePool,
}

impl SqlitePaymentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqlitePaymentRepo { pool }
    }

    fn row_to_record(row: SqliteRow) -> Result<PaymentRecord, LedgerError> {
        Ok(PaymentRecord {
            payment_id: row
                .try_get("payment_id")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            loan_id: row
                .try_get("loan_id")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            amount: row
                .try_get("amount")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            payment_date: row
                .try_get("payment_date")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            balance_after_payment: row
                .try_get("balance_after_payment")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
        })
    }
}

#[async_trait::async_trait]
impl PaymentRepo for SqlitePaymentRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        loan_id: LoanId,
        amount: f64,
        payment_date: NaiveDate,
        balance_after_payment: f64,
    ) -> Result<PaymentId, LedgerError> {
        let tx = downcast(tx);

        let result = sqlx::query(
            r#"
INSERT INTO payments (loan_id, amount, payment_date, balance_after_payment)
VALUES (?, ?, ?, ?)
"#,
        )
        .bind(loan_id)
        .bind(amount)
        .bind(payment_date)
        .bind(balance_after_payment)
        .execute(tx.conn())
        .await
        .map_err(classify_write_err)?;

        Ok(PaymentId(result.last_insert_rowid()))
    }

    async fn sum_for_loan_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        loan_id: LoanId,
    ) -> Result<f64, LedgerError> {
        let tx = downcast(tx);

        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE loan_id = ?")
            .bind(loan_id)
            .fetch_one(tx.conn())
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))
    }

    async fn sum_for_loan(&self, loan_id: LoanId) -> Result<f64, LedgerError> {
        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE loan_id = ?")
            .bind(loan_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))
    }

    async fn list_for_loan(&self, loan_id: LoanId) -> Result<Vec<PaymentRecord>, LedgerError> {
        let rows = sqlx::query(
            r#"
SELECT payment_id, loan_id, amount, payment_date, balance_after_payment
FROM payments
WHERE loan_id = ?
ORDER BY payment_id
"#,
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        rows.into_iter().map(Self::row_to_record).collect()
    }
}

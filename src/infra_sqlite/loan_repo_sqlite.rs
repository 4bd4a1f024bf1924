use super::util::{classify_write_err, downcast};
use crate::application_port::{LedgerError, NewLoan, StatusCount};
use crate::domain_model::{LoanId, LoanStatus};
use crate::domain_port::{LoanRecord, LoanRepo, LoanWithBorrower, StorageTx};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub struct SqliteLoanRepo {
    pool: SqlitePool,
}

const JOIN_COLUMNS: &str = r#"
SELECT l.loan_id, b.full_name, l.amount, l.interest_rate, l.term_months, l.start_date, l.status
FROM loans l JOIN borrowers b ON l.borrower_id = b.borrower_id
"#;

impl SqliteLoanRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteLoanRepo { pool }
    }

    fn status_from_row(row: &SqliteRow) -> Result<LoanStatus, LedgerError> {
        let status: String = row
            .try_get("status")
            .map_err(|e| LedgerError::Store(e.to_string()))?;
        status
            .parse::<LoanStatus>()
            .map_err(|e| LedgerError::Store(e.to_string()))
    }

    fn row_to_record(row: SqliteRow) -> Result<LoanRecord, LedgerError> {
        let status = Self::status_from_row(&row)?;
        Ok(LoanRecord {
            loan_id: row
                .try_get("loan_id")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            borrower_id: row
                .try_get("borrower_id")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            amount: row
                .try_get("amount")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            interest_rate: row
                .try_get("interest_rate")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            term_months: row
                .try_get("term_months")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            start_date: row
                .try_get("start_date")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            status,
        })
    }

    fn row_to_joined(row: SqliteRow) -> Result<LoanWithBorrower, LedgerError> {
        let status = Self::status_from_row(&row)?;
        Ok(LoanWithBorrower {
            loan_id: row
                .try_get("loan_id")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            full_name: row
                .try_get("full_name")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            amount: row
                .try_get("amount")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            interest_rate: row
                .try_get("interest_rate")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            term_months: row
                .try_get("term_months")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            start_date: row
                .try_get("start_date")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            status,
        })
    }
}

#[async_trait::async_trait]
impl LoanRepo for SqliteLoanRepo {
    async fn insert(&self, input: &NewLoan, status: LoanStatus) -> Result<LoanId, LedgerError> {
        let result = sqlx::query(
            r#"
INSERT INTO loans (borrower_id, amount, interest_rate, term_months, start_date, status)
VALUES (?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(input.borrower_id)
        .bind(input.amount)
        .bind(input.interest_rate)
        .bind(input.term_months)
        .bind(input.start_date)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(classify_write_err)?;

        Ok(LoanId(result.last_insert_rowid()))
    }

    async fn get(&self, loan_id: LoanId) -> Result<Option<LoanRecord>, LedgerError> {
        let row_opt = sqlx::query(
            r#"
SELECT loan_id, borrower_id, amount, interest_rate, term_months, start_date, status
FROM loans
WHERE loan_id = ?
"#,
        )
        .bind(loan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        loan_id: LoanId,
    ) -> Result<Option<LoanRecord>, LedgerError> {
        let tx = downcast(tx);

        let row_opt = sqlx::query(
            r#"
SELECT loan_id, borrower_id, amount, interest_rate, term_months, start_date, status
FROM loans
WHERE loan_id = ?
"#,
        )
        .bind(loan_id)
        .fetch_optional(tx.conn())
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn set_status_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        loan_id: LoanId,
        status: LoanStatus,
    ) -> Result<(), LedgerError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE loans SET status = ? WHERE loan_id = ?")
            .bind(status.as_str())
            .bind(loan_id)
            .execute(tx.conn())
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;

        Ok(())
    }

    async fn list_with_borrowers(&self) -> Result<Vec<LoanWithBorrower>, LedgerError> {
        let sql = format!("{JOIN_COLUMNS} ORDER BY l.loan_id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;

        rows.into_iter().map(Self::row_to_joined).collect()
    }

    async fn search_with_borrowers(
        &self,
        query: &str,
    ) -> Result<Vec<LoanWithBorrower>, LedgerError> {
        let pattern = format!("%{query}%");
        let sql = format!("{JOIN_COLUMNS} WHERE b.full_name LIKE ? OR l.loan_id LIKE ? ORDER BY l.loan_id");

        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;

        rows.into_iter().map(Self::row_to_joined).collect()
    }

    async fn count_all(&self) -> Result<i64, LedgerError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))
    }

    async fn total_amount(&self) -> Result<f64, LedgerError> {
        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM loans")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))
    }

    async fn count_with_status(&self, status: LoanStatus) -> Result<i64, LedgerError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))
    }

    async fn status_breakdown(&self) -> Result<Vec<StatusCount>, LedgerError> {
        let rows = sqlx::query("SELECT status, COUNT(*) AS n FROM loans GROUP BY status")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let status = Self::status_from_row(&row)?;
                let count: i64 = row
                    .try_get("n")
                    .map_err(|e| LedgerError::Store(e.to_string()))?;
                Ok(StatusCount { status, count })
            })
            .collect()
    }

    async fn list_amounts(&self) -> Result<Vec<f64>, LedgerError> {
        sqlx::query_scalar("SELECT amount FROM loans ORDER BY loan_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))
    }
}

use super::util::classify_write_err;
use crate::application_port::{LedgerError, NewBorrower};
use crate::domain_model::BorrowerId;
use crate::domain_port::{BorrowerRecord, BorrowerRepo};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub struct SqliteBorrowerRepo {
    pool: SqlitePool,
}

impl SqliteBorrowerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteBorrowerRepo { pool }
    }

    fn row_to_record(row: SqliteRow) -> Result<BorrowerRecord, LedgerError> {
        Ok(BorrowerRecord {
            borrower_id: row
                .try_get("borrower_id")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            full_name: row
                .try_get("full_name")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            contact: row
                .try_get("contact")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            email: row
                .try_get("email")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            address: row
                .try_get("address")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            id_type: row
                .try_get("id_type")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
            id_number: row
                .try_get("id_number")
                .map_err(|e| LedgerError::Store(e.to_string()))?,
        })
    }
}

#[async_trait::async_trait]
impl BorrowerRepo for SqliteBorrowerRepo {
    async fn insert(&self, input: &NewBorrower) -> Result<BorrowerId, LedgerError> {
        let result = sqlx::query(
            r#"
INSERT INTO borrowers (full_name, contact, email, address, id_type, id_number)
VALUES (?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(&input.full_name)
        .bind(&input.contact)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.id_type)
        .bind(&input.id_number)
        .execute(&self.pool)
        .await
        .map_err(classify_write_err)?;

        Ok(BorrowerId(result.last_insert_rowid()))
    }

    async fn list(&self) -> Result<Vec<BorrowerRecord>, LedgerError> {
        let rows = sqlx::query(
            r#"
SELECT borrower_id, full_name, contact, email, address, id_type, id_number
FROM borrowers
ORDER BY borrower_id
"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn search(&self, query: &str) -> Result<Vec<BorrowerRecord>, LedgerError> {
        let pattern = format!("%{query}%");

        let rows = sqlx::query(
            r#"
SELECT borrower_id, full_name, contact, email, address, id_type, id_number
FROM borrowers
WHERE full_name LIKE ? OR id_number LIKE ?
ORDER BY borrower_id
"#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn get_by_name(&self, full_name: &str) -> Result<Option<BorrowerRecord>, LedgerError> {
        let row_opt = sqlx::query(
            r#"
SELECT borrower_id, full_name, contact, email, address, id_type, id_number
FROM borrowers
WHERE full_name = ?
"#,
        )
        .bind(full_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn list_names(&self) -> Result<Vec<String>, LedgerError> {
        let names = sqlx::query_scalar("SELECT full_name FROM borrowers ORDER BY borrower_id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;

        Ok(names)
    }
}

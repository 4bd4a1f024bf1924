use crate::application_port::CredentialHasher;
use crate::domain_port::CredentialRepo;
use sqlx::SqlitePool;
use tracing::info;

/// Idempotent startup setup: every table is `CREATE TABLE IF NOT EXISTS`,
/// nothing is migrated or dropped, and the default operator credential is
/// seeded only while the users table is empty. Safe to run on every launch.
pub struct SchemaInitializer {
    pool: SqlitePool,
}

impl SchemaInitializer {
    pub fn new(pool: SqlitePool) -> Self {
        SchemaInitializer { pool }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS borrowers (
    borrower_id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    contact TEXT,
    email TEXT,
    address TEXT,
    id_type TEXT,
    id_number TEXT
)
"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS loans (
    loan_id INTEGER PRIMARY KEY AUTOINCREMENT,
    borrower_id INTEGER,
    amount REAL NOT NULL,
    interest_rate REAL NOT NULL,
    term_months INTEGER NOT NULL,
    start_date TEXT NOT NULL,
    status TEXT NOT NULL,
    FOREIGN KEY (borrower_id) REFERENCES borrowers (borrower_id)
)
"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS payments (
    payment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    loan_id INTEGER,
    amount REAL NOT NULL,
    payment_date TEXT NOT NULL,
    balance_after_payment REAL NOT NULL,
    FOREIGN KEY (loan_id) REFERENCES loans (loan_id)
)
"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL
)
"#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Seeds the default operator credential, once. An existing row (even a
    /// different username) means the table was already seeded and is left
    /// untouched.
    pub async fn seed_default_credential(
        &self,
        repo: &dyn CredentialRepo,
        hasher: &dyn CredentialHasher,
        username: &str,
        secret: &str,
    ) -> anyhow::Result<()> {
        if repo.count().await? > 0 {
            return Ok(());
        }

        let secret_hash = hasher.hash_secret(secret).await?;
        repo.insert(username, &secret_hash).await?;

        info!(username, "seeded default operator credential");
        Ok(())
    }
}

use crate::application_port::AuthError;
use crate::domain_port::{CredentialRecord, CredentialRepo};
use sqlx::{Row, SqlitePool};

pub struct SqliteCredentialRepo {
    pool: SqlitePool,
}

impl SqliteCredentialRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCredentialRepo { pool }
    }
}

#[async_trait::async_trait]
impl CredentialRepo for SqliteCredentialRepo {
    async fn count(&self) -> Result<i64, AuthError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))
    }

    async fn insert(&self, username: &str, secret_hash: &str) -> Result<(), AuthError> {
        sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(secret_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(())
    }

    async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        let row_opt = sqlx::query("SELECT username, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        row_opt
            .map(|row| {
                Ok(CredentialRecord {
                    username: row
                        .try_get("username")
                        .map_err(|e: sqlx::Error| AuthError::Store(e.to_string()))?,
                    secret_hash: row
                        .try_get("password_hash")
                        .map_err(|e: sqlx::Error| AuthError::Store(e.to_string()))?,
                })
            })
            .transpose()
    }
}

use anyhow::{Context, anyhow};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::{Path, PathBuf};

/// Owns the connection to the store file. One instance per process; the pool
/// is capped at a single connection to match the single-writer usage of the
/// desktop shell.
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if missing) the store file. The journal mode is kept
    /// at rollback so the db stays a single file and `backup_to` can be a
    /// plain byte copy.
    pub async fn connect(path: impl AsRef<Path>) -> anyhow::Result<SqliteStore> {
        let path = path.as_ref().to_path_buf();

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("open store at {:?}", path))?;

        Ok(SqliteStore { pool, path })
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verbatim byte copy of the store file to an operator-chosen path. No
    /// schema version tag accompanies the copy.
    pub async fn backup_to(&self, dest: impl AsRef<Path>) -> anyhow::Result<u64> {
        let dest = dest.as_ref();
        let bytes = tokio::fs::copy(&self.path, dest)
            .await
            .map_err(|e| anyhow!("backup to {:?}: {}", dest, e))?;
        Ok(bytes)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

use crate::domain_port::{StorageTx, TxManager};
use anyhow::anyhow;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

pub struct SqliteTxManager {
    pool: SqlitePool,
}

impl SqliteTxManager {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteTxManager { pool }
    }
}

#[async_trait::async_trait]
impl TxManager for SqliteTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        let tx = self.pool.begin().await.map_err(|e| anyhow!(e))?;
        Ok(Box::new(SqliteTx::new(tx)))
    }
}

pub struct SqliteTx<'t> {
    inner: Transaction<'t, Sqlite>,
}

impl<'t> SqliteTx<'t> {
    pub fn new(inner: Transaction<'t, Sqlite>) -> Self {
        SqliteTx { inner }
    }

    pub fn conn(&mut self) -> &mut SqliteConnection {
        self.inner.as_mut()
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for SqliteTx<'t> {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.inner.commit().await.map_err(|e| anyhow!(e))?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        self.inner.rollback().await.map_err(|e| anyhow!(e))?;
        Ok(())
    }
}

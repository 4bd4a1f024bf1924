use super::repo_tx_sqlite::SqliteTx;
use crate::application_port::LedgerError;
use crate::domain_port::*;
use sqlx::error::ErrorKind;

/// The only `StorageTx` in this crate is `SqliteTx`, minted by
/// `SqliteTxManager::begin`; the pointer cast is sound only as long as that
/// holds.
pub fn downcast<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> &'a mut SqliteTx<'t> {
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut SqliteTx<'t>;
        &mut *p
    }
}

/// Integrity violations become the undiscriminated `Rejected` signal; the
/// caller gets one message no matter which constraint fired.
pub fn classify_write_err(err: sqlx::Error) -> LedgerError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(
            db.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ) {
            return LedgerError::Rejected;
        }
    }

    LedgerError::Store(err.to_string())
}

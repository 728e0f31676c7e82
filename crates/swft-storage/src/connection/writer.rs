//! Write transactions.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use swft_core::errors::StorageError;

/// Run `f` inside a `BEGIN IMMEDIATE` transaction.
///
/// The write lock is taken at transaction start, so concurrent writers queue
/// on `busy_timeout` instead of failing at their first write. Commits when `f`
/// returns `Ok`; any `Err` (or a panic unwinding through `f`) drops the
/// transaction, which rolls it back.
pub fn with_immediate_transaction<F, T, E>(conn: &Connection, f: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|e| {
        StorageError::sqlite(format!("failed to begin immediate transaction: {e}"))
    })?;

    let result = f(&tx)?;

    tx.commit()
        .map_err(|e| StorageError::sqlite(format!("failed to commit: {e}")))?;

    Ok(result)
}

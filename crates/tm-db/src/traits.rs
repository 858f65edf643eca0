//! Database trait definition

use crate::error::{DbError, DbResult};

/// Statement execution and transaction primitive used by the migrator.
///
/// Statements are opaque strings and are passed to the backend unmodified.
/// Execution is synchronous; a connection is driven by one caller at a time.
pub trait Database {
    /// Execute a single statement, returns affected rows
    fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute one or more statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return its first column as integers, one per row
    fn query_i64_column(&self, sql: &str) -> DbResult<Vec<i64>>;

    /// Check if a table or view exists
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Open a transaction
    fn begin_transaction(&self) -> DbResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
///
/// The body's error is returned unchanged. A failed `COMMIT` is rolled back
/// and reported as [`DbError::TransactionError`].
pub fn with_transaction<D, F, T, E>(db: &D, body: F) -> Result<T, E>
where
    D: Database + ?Sized,
    F: FnOnce(&D) -> Result<T, E>,
    E: From<DbError>,
{
    db.begin_transaction()?;

    let result = body(db);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = db.commit() {
                if let Err(rollback_err) = db.rollback() {
                    log::warn!("ROLLBACK after failed COMMIT also failed: {rollback_err}");
                }
                return Err(DbError::TransactionError(format!("COMMIT failed: {commit_err}")).into());
            }
        }
        Err(_) => {
            if let Err(rollback_err) = db.rollback() {
                log::warn!("ROLLBACK failed: {rollback_err}");
            }
        }
    }
    result
}

#[cfg(test)]
#[path = "traits_test.rs"]
mod tests;

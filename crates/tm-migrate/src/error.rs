//! Error types for the migrator.

use thiserror::Error;
use tm_core::CoreError;
use tm_db::DbError;

/// Migrator errors.
///
/// Registry and database errors are wrapped transparently so callers see the
/// original error and message.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Registry, loader, or config error (including a missing migration)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Statement or transaction failure reported by the database
    #[error(transparent)]
    Db(#[from] DbError),

    /// The version table holds more than one row (MG001).
    #[error("[MG001] Schema information has multiple values: {table} holds {rows} rows")]
    InconsistentVersionStore { table: String, rows: usize },

    /// The stored version is not a valid version number (MG002).
    #[error("[MG002] Invalid version {value} stored in {table}")]
    InvalidStoredVersion { table: String, value: i64 },

    /// The version table name cannot be used in SQL (MG003).
    #[error("[MG003] Invalid version table name '{0}'")]
    InvalidVersionTable(String),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// True when the error is a lookup miss for an unregistered version
    pub fn is_migration_not_found(&self) -> bool {
        matches!(self, MigrateError::Core(CoreError::MigrationNotFound { .. }))
    }
}

//! Single-row table recording the applied schema version.

use crate::error::{MigrateError, MigrateResult};
use tm_core::config::{is_plain_identifier, DEFAULT_VERSION_TABLE};
use tm_db::Database;

/// Access to the version table.
///
/// The table holds exactly one row with one integer column `version`,
/// defaulting to 0 ("nothing applied").
#[derive(Debug, Clone)]
pub struct VersionStore {
    table: String,
}

impl Default for VersionStore {
    fn default() -> Self {
        Self {
            table: DEFAULT_VERSION_TABLE.to_string(),
        }
    }
}

impl VersionStore {
    /// Use `table` as the version table
    pub fn new(table: impl Into<String>) -> MigrateResult<Self> {
        let table = table.into();
        if !is_plain_identifier(&table) {
            return Err(MigrateError::InvalidVersionTable(table));
        }
        Ok(Self { table })
    }

    /// Name of the version table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the table and its default row if missing.
    ///
    /// Safe to call repeatedly: the row is only inserted into an empty table.
    pub fn ensure_schema<D: Database + ?Sized>(&self, db: &D) -> MigrateResult<()> {
        db.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (version INTEGER NOT NULL DEFAULT 0)",
            self.table
        ))?;

        let rows = db.query_i64_column(&format!("SELECT COUNT(*) FROM {}", self.table))?;
        if rows.first().copied().unwrap_or(0) == 0 {
            log::debug!("Initialising {} at version 0", self.table);
            db.execute(&format!("INSERT INTO {} (version) VALUES (0)", self.table))?;
        }
        Ok(())
    }

    /// Read the applied version.
    ///
    /// More than one row is reported, never repaired.
    pub fn read_version<D: Database + ?Sized>(&self, db: &D) -> MigrateResult<u32> {
        let values = db.query_i64_column(&format!(
            "SELECT CAST(version AS BIGINT) FROM {}",
            self.table
        ))?;

        if values.len() > 1 {
            return Err(MigrateError::InconsistentVersionStore {
                table: self.table.clone(),
                rows: values.len(),
            });
        }

        let value = values.first().copied().unwrap_or(0);
        u32::try_from(value).map_err(|_| MigrateError::InvalidStoredVersion {
            table: self.table.clone(),
            value,
        })
    }

    /// Overwrite the applied version. Range checks are the caller's job.
    pub fn write_version<D: Database + ?Sized>(&self, db: &D, version: u32) -> MigrateResult<()> {
        db.execute(&format!("UPDATE {} SET version = {version}", self.table))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "version_store_test.rs"]
mod tests;

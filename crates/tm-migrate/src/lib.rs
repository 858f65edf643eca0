//! Migrator for Tidemark.
//!
//! Moves a database between schema versions by applying or reverting
//! registered migrations one step at a time, each step in its own
//! transaction, and records the reached version in a single-row table.

pub mod error;
pub mod migrator;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod version_store;

pub use error::{MigrateError, MigrateResult};
pub use migrator::{MigrationStatus, Migrator, MigratorOptions, RunOutcome, Step};
pub use version_store::VersionStore;

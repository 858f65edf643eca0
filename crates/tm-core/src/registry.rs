//! Ordered, in-memory collection of migrations.
//!
//! Registration order is version order: the first registered migration is
//! version 1. Version 0 is "nothing applied" and has no record.

use crate::error::{CoreError, CoreResult};
use crate::loader::MigrationSource;
use crate::migration::{Migration, MigrationBuilder};

/// Ordered migrations indexed by 1-based version.
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    migrations: Vec<Migration>,
}

impl MigrationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a migration as the next version and return it
    pub fn register(&mut self, migration: Migration) -> &Migration {
        self.migrations.push(migration);
        log::debug!("Registered migration version {}", self.migrations.len());
        &self.migrations[self.migrations.len() - 1]
    }

    /// Build a migration from `source` and register it as the next version
    pub fn register_source<S: MigrationSource + ?Sized>(&mut self, source: &S) -> &Migration {
        let mut builder = MigrationBuilder::new();
        source.define(&mut builder);
        self.register(builder.build())
    }

    /// All migrations in version order
    pub fn list(&self) -> &[Migration] {
        &self.migrations
    }

    /// Look up the migration for `version` (1-based)
    pub fn get(&self, version: u32) -> CoreResult<&Migration> {
        let index = usize::try_from(version)
            .ok()
            .and_then(|v| v.checked_sub(1))
            .ok_or(CoreError::MigrationNotFound { version })?;
        self.migrations
            .get(index)
            .ok_or(CoreError::MigrationNotFound { version })
    }

    /// Whether `version` resolves to a registered migration
    pub fn contains(&self, version: u32) -> bool {
        self.get(version).is_ok()
    }

    /// Remove every registered migration
    pub fn clear(&mut self) {
        self.migrations.clear();
    }

    /// Number of registered migrations
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Whether no migrations are registered
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Highest registered version, 0 when empty
    pub fn latest_version(&self) -> u32 {
        u32::try_from(self.migrations.len()).unwrap_or(u32::MAX)
    }
}

impl FromIterator<Migration> for MigrationRegistry {
    fn from_iter<I: IntoIterator<Item = Migration>>(iter: I) -> Self {
        Self {
            migrations: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

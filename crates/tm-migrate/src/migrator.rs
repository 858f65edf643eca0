//! Sequential forward/backward migration runner.
//!
//! The migrator moves the version recorded in the [`VersionStore`] to a
//! target by applying (or reverting) one registered migration at a time.
//! Each step runs in its own transaction and the stored version is only
//! advanced after that transaction commits.
//!
//! A single operator is assumed: nothing guards against two migrators
//! driving the same database at once.

use crate::error::MigrateResult;
use crate::version_store::VersionStore;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tm_core::config::DEFAULT_VERSION_TABLE;
use tm_core::{load_directory, CoreError, Direction, MigrationRegistry};
use tm_db::{with_transaction, Database};

/// Construction options for [`Migrator`]
#[derive(Debug, Clone)]
pub struct MigratorOptions {
    /// Directory scanned for migration files; `None` disables loading
    pub directory: Option<PathBuf>,

    /// Table that stores the applied version
    pub version_table: String,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            directory: None,
            version_table: DEFAULT_VERSION_TABLE.to_string(),
        }
    }
}

impl MigratorOptions {
    /// Options with no directory and the default version table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load migrations from `dir`
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    /// Record the version in `table` instead of `schema_information`
    pub fn version_table(mut self, table: impl Into<String>) -> Self {
        self.version_table = table.into();
        self
    }
}

/// One migration applied in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    pub version: u32,
    pub direction: Direction,
}

impl Step {
    /// Version recorded once this step commits
    pub fn resulting_version(&self) -> u32 {
        match self.direction {
            Direction::Up => self.version,
            Direction::Down => self.version.saturating_sub(1),
        }
    }
}

/// Result of [`Migrator::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Already at the target (or nothing is registered); nothing was executed
    UpToDate { version: u32 },

    /// Every planned step was applied
    Migrated {
        from: u32,
        to: u32,
        steps: usize,
        elapsed: Duration,
    },
}

/// Applied state of one registered migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: u32,
    pub applied: bool,
    pub up_statements: usize,
    pub down_statements: usize,
    /// File the migration was loaded from, if any
    pub source: Option<PathBuf>,
}

/// Drives a database between schema versions.
pub struct Migrator<D: Database> {
    db: D,
    registry: MigrationRegistry,
    store: VersionStore,
    loaded_files: Vec<PathBuf>,
    /// Number of migrations registered before the directory was loaded
    file_offset: usize,
}

impl<D: Database> Migrator<D> {
    /// Load migrations from the configured directory and prepare the version
    /// table.
    pub fn new(db: D, options: MigratorOptions) -> MigrateResult<Self> {
        Self::with_registry(db, MigrationRegistry::new(), options)
    }

    /// Like [`Migrator::new`], but starting from an already populated
    /// registry. Directory migrations are appended after its entries.
    pub fn with_registry(
        db: D,
        mut registry: MigrationRegistry,
        options: MigratorOptions,
    ) -> MigrateResult<Self> {
        let store = VersionStore::new(options.version_table)?;

        let file_offset = registry.len();
        let loaded_files = match &options.directory {
            Some(dir) => load_directory(dir, &mut registry)?,
            None => Vec::new(),
        };
        log::debug!(
            "Registered {} migration(s), {} from files",
            registry.len(),
            loaded_files.len()
        );

        store.ensure_schema(&db)?;

        Ok(Self {
            db,
            registry,
            store,
            loaded_files,
            file_offset,
        })
    }

    /// The underlying database
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Registered migrations
    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// Registered migrations, for adding more after construction
    pub fn registry_mut(&mut self) -> &mut MigrationRegistry {
        &mut self.registry
    }

    /// Migration files loaded at construction, in version order
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }

    /// The version table accessor
    pub fn version_store(&self) -> &VersionStore {
        &self.store
    }

    /// Version currently recorded in the database
    pub fn current_version(&self) -> MigrateResult<u32> {
        self.store.read_version(&self.db)
    }

    /// Steps [`Migrator::run`] would execute for `target` (latest if `None`).
    pub fn plan(&self, target: Option<u32>) -> MigrateResult<Vec<Step>> {
        let current = self.current_version()?;
        self.plan_from(current, target)
    }

    fn plan_from(&self, current: u32, target: Option<u32>) -> MigrateResult<Vec<Step>> {
        let latest = self.registry.latest_version();
        let target = target.unwrap_or(latest);

        if target == current || self.registry.is_empty() {
            return Ok(Vec::new());
        }

        // Out-of-range targets fail before any step runs
        if target > latest {
            return Err(CoreError::MigrationNotFound { version: target }.into());
        }

        let steps = if target > current {
            (current + 1..=target)
                .map(|version| Step {
                    version,
                    direction: Direction::Up,
                })
                .collect()
        } else {
            (target + 1..=current)
                .rev()
                .map(|version| Step {
                    version,
                    direction: Direction::Down,
                })
                .collect()
        };
        Ok(steps)
    }

    /// Migrate to `target`, or to the latest registered version if `None`.
    ///
    /// Steps run strictly in order and the run stops at the first failure;
    /// steps committed before it stay committed.
    pub fn run(&self, target: Option<u32>) -> MigrateResult<RunOutcome> {
        let current = self.current_version()?;
        let steps = self.plan_from(current, target)?;

        let Some(last) = steps.last() else {
            log::info!("Nothing to do.");
            return Ok(RunOutcome::UpToDate { version: current });
        };
        let to = last.resulting_version();

        let started = Instant::now();
        log::info!("Migrating from {current} to version {to}");

        for step in &steps {
            self.apply(step.version, step.direction)?;
        }

        let elapsed = started.elapsed();
        log::info!(
            "Finished applying migration {to}, took {:.6} seconds",
            elapsed.as_secs_f64()
        );
        log::info!("Done!");

        Ok(RunOutcome::Migrated {
            from: current,
            to,
            steps: steps.len(),
            elapsed,
        })
    }

    /// Apply or revert the migration registered as `version`.
    ///
    /// On failure the transaction is rolled back, the error and the still
    /// recorded version are logged, and the error is returned unchanged.
    pub fn apply(&self, version: u32, direction: Direction) -> MigrateResult<()> {
        let result = self.apply_step(Step { version, direction });

        if let Err(err) = &result {
            log::error!("{err}");
            match self.current_version() {
                Ok(current) => log::info!("The migration failed. Current version {current}"),
                Err(read_err) => log::error!(
                    "The migration failed and the current version could not be read: {read_err}"
                ),
            }
        }
        result
    }

    fn apply_step(&self, step: Step) -> MigrateResult<()> {
        let migration = self.registry.get(step.version)?;
        let statements = migration.statements(step.direction);

        log::info!(
            "Applying version {} ({}), {} statement(s)",
            step.version,
            step.direction,
            statements.len()
        );

        with_transaction(&self.db, |db| -> MigrateResult<()> {
            for statement in &statements {
                db.execute_batch(statement)?;
            }
            Ok(())
        })?;

        self.store.write_version(&self.db, step.resulting_version())
    }

    /// Applied state of every registered migration.
    pub fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        let current = self.current_version()?;
        let statuses = self
            .registry
            .list()
            .iter()
            .enumerate()
            .map(|(index, migration)| {
                let version = u32::try_from(index + 1).unwrap_or(u32::MAX);
                MigrationStatus {
                    version,
                    applied: version <= current,
                    up_statements: migration.up().len(),
                    down_statements: migration.down().len(),
                    source: self.source_of(index).map(Path::to_path_buf),
                }
            })
            .collect();
        Ok(statuses)
    }

    fn source_of(&self, index: usize) -> Option<&Path> {
        index
            .checked_sub(self.file_offset)
            .and_then(|i| self.loaded_files.get(i))
            .map(PathBuf::as_path)
    }

    /// Give back the database handle
    pub fn into_db(self) -> D {
        self.db
    }
}

impl<D: Database> std::fmt::Debug for Migrator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("db_type", &self.db.db_type())
            .field("migrations", &self.registry.len())
            .field("version_table", &self.store.table())
            .field("loaded_files", &self.loaded_files)
            .finish()
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;

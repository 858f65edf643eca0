//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tm_core::{Config, CoreError};
use tm_db::DuckDbBackend;
use tm_migrate::{Migrator, MigratorOptions};

use crate::cli::GlobalArgs;

/// Project root plus its resolved configuration
pub(crate) struct ProjectContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl ProjectContext {
    /// Absolute-or-relative migration directory for this project
    pub(crate) fn migration_dir(&self) -> PathBuf {
        self.config.migration_dir(&self.root)
    }
}

/// Load `tidemark.yml` (or the `--config` override) and apply CLI overrides.
///
/// A project without a config file runs on defaults.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<ProjectContext> {
    let root = PathBuf::from(&global.project_dir);

    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config {path}"))?,
        None => match Config::load_from_dir(&root) {
            Ok(config) => config,
            Err(CoreError::ConfigNotFound { path }) => {
                log::debug!("No config at {path}, using defaults");
                Config::default()
            }
            Err(e) => return Err(e).context("Failed to load project config"),
        },
    };

    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }

    Ok(ProjectContext { root, config })
}

/// Open the configured database and build a migrator over the project's
/// migration directory.
pub(crate) fn open_migrator(project: &ProjectContext) -> Result<Migrator<DuckDbBackend>> {
    let db_path = project.config.database_path(&project.root);
    let db = DuckDbBackend::new(&db_path)
        .with_context(|| format!("Failed to open database {db_path}"))?;

    if db_path == ":memory:" {
        log::warn!("Using an in-memory database; the applied version will not persist");
    }

    let options = MigratorOptions::new()
        .directory(project.migration_dir())
        .version_table(project.config.version_table.clone());

    Migrator::new(db, options).context("Failed to initialise migrator")
}

//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default table holding the applied schema version
pub const DEFAULT_VERSION_TABLE: &str = "schema_information";

/// Project configuration from tidemark.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory containing numbered migration files
    #[serde(default = "default_migration_path")]
    pub migration_path: String,

    /// Table that stores the applied version
    #[serde(default = "default_version_table")]
    pub version_table: String,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            migration_path: default_migration_path(),
            version_table: default_version_table(),
        }
    }
}

fn default_migration_path() -> String {
    "migrations".to_string()
}

fn default_version_table() -> String {
    DEFAULT_VERSION_TABLE.to_string()
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("tidemark.yml");
        let yaml_path = dir.join("tidemark.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.migration_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migration_path cannot be empty".to_string(),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if !is_plain_identifier(&self.version_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "version_table '{}' must be a plain SQL identifier (letters, digits, underscores)",
                    self.version_table
                ),
            });
        }

        Ok(())
    }

    /// Migration directory resolved against the project root
    pub fn migration_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.migration_path)
    }

    /// Database path resolved against the project root (`:memory:` is kept as-is)
    pub fn database_path(&self, root: &Path) -> String {
        if self.database.path == ":memory:" || Path::new(&self.database.path).is_absolute() {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

/// True for identifiers safe to splice into SQL unquoted.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

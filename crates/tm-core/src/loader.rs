//! Migration file discovery and loading.
//!
//! A migration file is a YAML document named `<digits>_<name>.yml` (or
//! `.yaml`) with optional `up` and `down` statement lists:
//!
//! ```yaml
//! up:
//!   - CREATE TABLE users (id INTEGER, name VARCHAR)
//! down:
//!   - DROP TABLE users
//! ```
//!
//! Files are registered in numeric prefix order, so the prefix decides the
//! version each file becomes.

use crate::error::{CoreError, CoreResult};
use crate::migration::MigrationBuilder;
use crate::registry::MigrationRegistry;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Minimum zero-padded width of generated migration prefixes.
const PREFIX_WIDTH: usize = 3;

/// Anything that can define one migration through a builder.
///
/// Each loaded file registers exactly one migration via this hook.
pub trait MigrationSource {
    /// Populate the `up` / `down` blocks of `migration`
    fn define(&self, migration: &mut MigrationBuilder);
}

/// Parsed contents of a migration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationFile {
    /// Forward statements
    #[serde(default, deserialize_with = "null_as_empty")]
    pub up: Vec<String>,

    /// Reverse statements, in authoring order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub down: Vec<String>,
}

/// A bare `up:` or `down:` key is an empty block.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl MigrationFile {
    /// Read and parse a migration file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| CoreError::MigrationParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parse migration YAML. A file holding only comments is an empty migration.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let is_blank = content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if is_blank {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

impl MigrationSource for MigrationFile {
    fn define(&self, migration: &mut MigrationBuilder) {
        migration.up(|s| {
            for statement in &self.up {
                s.execute(statement.as_str());
            }
        });
        migration.down(|s| {
            for statement in &self.down {
                s.execute(statement.as_str());
            }
        });
    }
}

/// Split a migration file name into its numeric prefix and digit text.
///
/// Returns `None` for anything not shaped like `<digits>_<name>.yml`.
fn parse_file_name(path: &Path) -> Option<(u64, &str)> {
    let extension = path.extension()?.to_str()?;
    if !extension.eq_ignore_ascii_case("yml") && !extension.eq_ignore_ascii_case("yaml") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (digits, name) = stem.split_once('_')?;
    if digits.is_empty() || name.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = digits.parse().ok()?;
    Some((number, digits))
}

/// List the migration files in `dir`, sorted by numeric prefix.
///
/// Files that do not match `<digits>_<name>.yml|yaml` are ignored.
pub fn migration_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut files: Vec<(u64, String, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some((number, _)) = parse_file_name(&path) else {
            log::debug!("Ignoring non-migration file {}", path.display());
            continue;
        };
        let file_name = entry.file_name().to_string_lossy().into_owned();
        files.push((number, file_name, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(files.into_iter().map(|(_, _, path)| path).collect())
}

/// Load every migration file in `dir` into `registry`, in version order.
///
/// Returns the loaded file paths. Stops at the first file that fails to parse.
pub fn load_directory(dir: &Path, registry: &mut MigrationRegistry) -> CoreResult<Vec<PathBuf>> {
    let files = migration_files(dir)?;
    for path in &files {
        let file = MigrationFile::load(path)?;
        registry.register_source(&file);
        log::debug!(
            "Loaded {} as version {}",
            path.display(),
            registry.latest_version()
        );
    }
    Ok(files)
}

/// Compute the file name for a new migration appended after those in `dir`.
///
/// `name` is lowercased and anything outside `[a-z0-9]` becomes `_`. A
/// missing directory counts as empty.
pub fn next_migration_file_name(dir: &Path, name: &str) -> CoreResult<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: "name must contain at least one letter or digit".to_string(),
        });
    }

    let mut next: u64 = 1;
    let mut width = PREFIX_WIDTH;
    if dir.is_dir() {
        for path in migration_files(dir)? {
            if let Some((number, digits)) = parse_file_name(&path) {
                let following = number.checked_add(1).ok_or_else(|| {
                    CoreError::InvalidMigrationName {
                        name: name.to_string(),
                        reason: format!("no version follows prefix {digits} of {}", path.display()),
                    }
                })?;
                next = next.max(following);
                width = width.max(digits.len());
            }
        }
    }

    Ok(format!("{next:0width$}_{slug}.yml"))
}

fn slugify(name: &str) -> String {
    let lowered: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    lowered
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;

//! New command implementation

use anyhow::{Context, Result};
use std::fs;
use tm_core::next_migration_file_name;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::load_project;

const TEMPLATE: &str = "\
# Statements run top to bottom when migrating up.
up: []

# Statements run bottom to top when migrating down.
down: []
";

/// Execute the new command
pub(crate) fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let dir = project.migration_dir();

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create migration directory {}", dir.display()))?;

    let file_name = next_migration_file_name(&dir, &args.name)?;
    let path = dir.join(&file_name);
    fs::write(&path, TEMPLATE).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}

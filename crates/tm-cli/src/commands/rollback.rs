//! Rollback command implementation

use anyhow::Result;
use tm_migrate::RunOutcome;

use crate::cli::{GlobalArgs, RollbackArgs};
use crate::commands::common::{load_project, open_migrator};

/// Execute the rollback command
pub(crate) fn execute(args: &RollbackArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let migrator = open_migrator(&project)?;

    let current = migrator.current_version()?;
    if current == 0 {
        println!("Nothing to roll back, already at version 0");
        return Ok(());
    }

    let target = current.saturating_sub(args.steps);
    match migrator.run(Some(target))? {
        RunOutcome::UpToDate { version } => {
            println!("No migrations to roll back, still at version {version}");
        }
        RunOutcome::Migrated { from, to, .. } => {
            println!("Rolled back from version {from} to {to}");
        }
    }
    Ok(())
}

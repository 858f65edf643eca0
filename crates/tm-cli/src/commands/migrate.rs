//! Migrate command implementation

use anyhow::Result;
use tm_migrate::RunOutcome;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{load_project, open_migrator};

/// Execute the migrate command
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let migrator = open_migrator(&project)?;

    if args.dry_run {
        let current = migrator.current_version()?;
        let plan = migrator.plan(args.target)?;
        if plan.is_empty() {
            println!("Already at version {current}, nothing to do");
            return Ok(());
        }
        println!("Dry run - would apply {} step(s):", plan.len());
        for step in &plan {
            println!(
                "  {} version {} -> {}",
                step.direction,
                step.version,
                step.resulting_version()
            );
        }
        return Ok(());
    }

    match migrator.run(args.target)? {
        RunOutcome::UpToDate { version } => {
            println!("Already at version {version}, nothing to do");
        }
        RunOutcome::Migrated {
            from,
            to,
            steps,
            elapsed,
        } => {
            println!(
                "Migrated from version {from} to {to} ({steps} step{}, {:.3}s)",
                if steps == 1 { "" } else { "s" },
                elapsed.as_secs_f64()
            );
        }
    }
    Ok(())
}

//! Status command implementation

use anyhow::Result;
use serde::Serialize;
use tm_migrate::MigrationStatus;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{load_project, open_migrator};

/// JSON shape of `tm status --output json`
#[derive(Serialize)]
struct StatusReport {
    current_version: u32,
    latest_version: u32,
    migrations: Vec<MigrationStatus>,
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let migrator = open_migrator(&project)?;

    let report = StatusReport {
        current_version: migrator.current_version()?,
        latest_version: migrator.registry().latest_version(),
        migrations: migrator.status()?,
    };

    match args.output {
        StatusOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        StatusOutput::Table => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &StatusReport) {
    println!(
        "Current version: {} (latest {})",
        report.current_version, report.latest_version
    );
    if report.migrations.is_empty() {
        println!("No migrations found");
        return;
    }

    println!();
    println!("{:<8} {:<8} {:>4} {:>5}  SOURCE", "VERSION", "STATUS", "UP", "DOWN");
    for migration in &report.migrations {
        let source = migration
            .source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<8} {:>4} {:>5}  {}",
            migration.version,
            if migration.applied { "applied" } else { "pending" },
            migration.up_statements,
            migration.down_statements,
            source
        );
    }
}

//! tm-core - Core library for Tidemark
//!
//! This crate provides the migration record and its builder, the ordered
//! migration registry, migration file discovery, and project configuration
//! shared by the migrator and the CLI.

pub mod config;
pub mod error;
pub mod loader;
pub mod migration;
pub mod registry;

pub use config::{Config, DatabaseConfig, DEFAULT_VERSION_TABLE};
pub use error::{CoreError, CoreResult};
pub use loader::{
    load_directory, migration_files, next_migration_file_name, MigrationFile, MigrationSource,
};
pub use migration::{Direction, Migration, MigrationBuilder, StatementCollector};
pub use registry::MigrationRegistry;

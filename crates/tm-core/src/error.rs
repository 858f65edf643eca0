//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Migration directory not found
    #[error("[E004] Migration directory not found: {path}")]
    MigrationDirNotFound { path: String },

    /// E005: No migration registered under the requested version
    #[error("[E005] Can't find migration with version {version}")]
    MigrationNotFound { version: u32 },

    /// E006: Migration file could not be parsed
    #[error("[E006] Failed to parse migration {path}: {message}")]
    MigrationParseError { path: String, message: String },

    /// E008: Name cannot be turned into a migration file name
    #[error("[E008] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// E007: IO error with file path context
    #[error("[E007] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}

use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_full_config() {
    let yaml = r#"
database:
  path: dev.duckdb
migration_path: db/migrations
version_table: schema_version
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.database.path, "dev.duckdb");
    assert_eq!(config.migration_path, "db/migrations");
    assert_eq!(config.version_table, "schema_version");
}

#[test]
fn test_parse_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.migration_path, "migrations");
    assert_eq!(config.version_table, DEFAULT_VERSION_TABLE);
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("migrations: nope\n");
    assert!(result.is_err());
}

#[test]
fn test_load_from_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tidemark.yml"),
        "database:\n  path: app.duckdb\n",
    )
    .unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database.path, "app.duckdb");
    assert_eq!(
        config.database_path(dir.path()),
        dir.path().join("app.duckdb").display().to_string()
    );
    assert_eq!(
        config.migration_dir(dir.path()),
        dir.path().join("migrations")
    );
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tidemark.yaml"), "migration_path: sql\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.migration_path, "sql");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_invalid_yaml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tidemark.yml"), "database: [unclosed\n").unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_invalid_version_table_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tidemark.yml"),
        "version_table: \"drop table x; --\"\n",
    )
    .unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_memory_database_path_kept() {
    let config = Config::default();
    assert_eq!(config.database_path(Path::new("/tmp/project")), ":memory:");
}

#[test]
fn test_plain_identifier() {
    assert!(is_plain_identifier("schema_information"));
    assert!(is_plain_identifier("_v2"));
    assert!(!is_plain_identifier("2fast"));
    assert!(!is_plain_identifier("main.versions"));
    assert!(!is_plain_identifier(""));
}

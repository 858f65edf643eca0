//! Shared test helpers for the migrator.

use std::cell::RefCell;
use tm_core::{Migration, MigrationRegistry};
use tm_db::{Database, DbResult, DuckDbBackend};

/// In-memory DuckDB that records every statement and transaction boundary.
pub(crate) struct RecordingDb {
    inner: DuckDbBackend,
    log: RefCell<Vec<String>>,
}

impl RecordingDb {
    pub(crate) fn new() -> Self {
        Self {
            inner: DuckDbBackend::in_memory().unwrap(),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Everything executed so far, including BEGIN / COMMIT / ROLLBACK
    pub(crate) fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Forget everything recorded so far
    pub(crate) fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    /// Number of transactions opened
    pub(crate) fn transactions(&self) -> usize {
        self.log.borrow().iter().filter(|s| *s == "BEGIN").count()
    }

    fn record(&self, sql: &str) {
        self.log.borrow_mut().push(sql.to_string());
    }
}

impl Database for RecordingDb {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        self.record(sql);
        self.inner.execute(sql)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.record(sql);
        self.inner.execute_batch(sql)
    }

    fn query_i64_column(&self, sql: &str) -> DbResult<Vec<i64>> {
        self.inner.query_i64_column(sql)
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.inner.relation_exists(name)
    }

    fn begin_transaction(&self) -> DbResult<()> {
        self.record("BEGIN");
        self.inner.begin_transaction()
    }

    fn commit(&self) -> DbResult<()> {
        self.record("COMMIT");
        self.inner.commit()
    }

    fn rollback(&self) -> DbResult<()> {
        self.record("ROLLBACK");
        self.inner.rollback()
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}

/// Registry with a `users` table migration and a `films` migration that also
/// alters `users`.
pub(crate) fn users_and_films() -> MigrationRegistry {
    let mut registry = MigrationRegistry::new();
    registry.register(Migration::define(|m| {
        m.up(|s| {
            s.execute("CREATE TABLE users (id INTEGER, name VARCHAR(30), created_at TIMESTAMP)");
        });
        m.down(|s| {
            s.execute("DROP TABLE users");
        });
    }));
    registry.register(Migration::define(|m| {
        m.up(|s| {
            s.execute("CREATE TABLE films (code VARCHAR(5), title VARCHAR(30))");
            s.execute("ALTER TABLE users ADD COLUMN email VARCHAR(40)");
        });
        m.down(|s| {
            s.execute("DROP TABLE films");
            s.execute("ALTER TABLE users DROP COLUMN email");
        });
    }));
    registry
}

use super::*;
use std::cell::RefCell;

/// Records transaction-control calls and fails on demand.
#[derive(Default)]
struct FakeDb {
    calls: RefCell<Vec<String>>,
    fail_commit: bool,
}

impl Database for FakeDb {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_batch(sql).map(|_| 0)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.calls.borrow_mut().push(sql.to_string());
        if sql == "BAD" {
            return Err(DbError::ExecutionError("syntax error: BAD".to_string()));
        }
        Ok(())
    }

    fn query_i64_column(&self, _sql: &str) -> DbResult<Vec<i64>> {
        Ok(Vec::new())
    }

    fn relation_exists(&self, _name: &str) -> DbResult<bool> {
        Ok(false)
    }

    fn begin_transaction(&self) -> DbResult<()> {
        self.calls.borrow_mut().push("BEGIN".to_string());
        Ok(())
    }

    fn commit(&self) -> DbResult<()> {
        self.calls.borrow_mut().push("COMMIT".to_string());
        if self.fail_commit {
            return Err(DbError::TransactionError("disk full".to_string()));
        }
        Ok(())
    }

    fn rollback(&self) -> DbResult<()> {
        self.calls.borrow_mut().push("ROLLBACK".to_string());
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "fake"
    }
}

#[test]
fn test_success_commits() {
    let db = FakeDb::default();
    let value = with_transaction(&db, |db| -> DbResult<u32> {
        db.execute_batch("A")?;
        Ok(7)
    })
    .unwrap();

    assert_eq!(value, 7);
    assert_eq!(*db.calls.borrow(), vec!["BEGIN", "A", "COMMIT"]);
}

#[test]
fn test_failure_rolls_back_and_returns_body_error() {
    let db = FakeDb::default();
    let err = with_transaction(&db, |db| -> DbResult<()> {
        db.execute_batch("A")?;
        db.execute_batch("BAD")?;
        db.execute_batch("never")
    })
    .unwrap_err();

    assert!(matches!(err, DbError::ExecutionError(ref msg) if msg.contains("BAD")));
    assert_eq!(*db.calls.borrow(), vec!["BEGIN", "A", "BAD", "ROLLBACK"]);
}

#[test]
fn test_commit_failure_rolls_back() {
    let db = FakeDb {
        fail_commit: true,
        ..FakeDb::default()
    };
    let err = with_transaction(&db, |db| -> DbResult<()> { db.execute_batch("A") }).unwrap_err();

    assert!(matches!(err, DbError::TransactionError(ref msg) if msg.contains("COMMIT failed")));
    assert_eq!(*db.calls.borrow(), vec!["BEGIN", "A", "COMMIT", "ROLLBACK"]);
}

#[test]
fn test_body_error_type_is_preserved() {
    #[derive(Debug)]
    enum AppError {
        Db(DbError),
        Custom(&'static str),
    }

    impl From<DbError> for AppError {
        fn from(err: DbError) -> Self {
            AppError::Db(err)
        }
    }

    let db = FakeDb::default();
    let err = with_transaction(&db, |_| -> Result<(), AppError> { Err(AppError::Custom("nope")) })
        .unwrap_err();

    assert!(matches!(err, AppError::Custom("nope")));
    assert_eq!(*db.calls.borrow(), vec!["BEGIN", "ROLLBACK"]);
    assert!(matches!(
        AppError::from(DbError::TransactionError("x".into())),
        AppError::Db(_)
    ));
}

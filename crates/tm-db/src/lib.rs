//! tm-db - Database abstraction layer for Tidemark
//!
//! This crate provides the `Database` trait the migrator executes statements
//! through, the `with_transaction` helper, and a DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{with_transaction, Database};

//! Migration records and the builder used to define them.
//!
//! A migration is one version step: an ordered list of forward ("up")
//! statements and an ordered list of reverse ("down") statements. Statements
//! are opaque SQL strings and are never rewritten.

use serde::Serialize;
use std::fmt;

/// Direction a migration step is applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply the step (run `up` statements in authoring order)
    Up,
    /// Revert the step (run `down` statements in reverse authoring order)
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// One versioned schema change step.
///
/// Immutable once built: the statement lists are only reachable through
/// shared slices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    up: Vec<String>,
    down: Vec<String>,
}

impl Migration {
    /// Build a migration from a definition block.
    ///
    /// ```
    /// use tm_core::Migration;
    ///
    /// let migration = Migration::define(|m| {
    ///     m.up(|s| {
    ///         s.execute("CREATE TABLE users (id INTEGER)");
    ///     });
    ///     m.down(|s| {
    ///         s.execute("DROP TABLE users");
    ///     });
    /// });
    /// assert_eq!(migration.up(), ["CREATE TABLE users (id INTEGER)"]);
    /// ```
    pub fn define<F>(definition: F) -> Self
    where
        F: FnOnce(&mut MigrationBuilder),
    {
        let mut builder = MigrationBuilder::new();
        definition(&mut builder);
        builder.build()
    }

    /// Forward statements in authoring order
    pub fn up(&self) -> &[String] {
        &self.up
    }

    /// Reverse statements in authoring order
    pub fn down(&self) -> &[String] {
        &self.down
    }

    /// Statements in the order they must execute for `direction`.
    ///
    /// Down statements run last-authored first, so teardown mirrors setup.
    pub fn statements(&self, direction: Direction) -> Vec<&str> {
        match direction {
            Direction::Up => self.up.iter().map(String::as_str).collect(),
            Direction::Down => self.down.iter().rev().map(String::as_str).collect(),
        }
    }
}

/// Accumulates the statements issued inside an `up` or `down` block.
#[derive(Debug, Default)]
pub struct StatementCollector {
    statements: Vec<String>,
}

impl StatementCollector {
    /// Append a statement to the block
    pub fn execute(&mut self, statement: impl Into<String>) -> &mut Self {
        self.statements.push(statement.into());
        self
    }

    /// Statements collected so far
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    fn into_statements(self) -> Vec<String> {
        self.statements
    }
}

/// Builds a [`Migration`] from optional `up` and `down` blocks.
///
/// Calling a block again replaces that block's statements.
#[derive(Debug, Default)]
pub struct MigrationBuilder {
    up: Vec<String>,
    down: Vec<String>,
}

impl MigrationBuilder {
    /// Create a builder with empty `up` and `down` lists
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the forward statements
    pub fn up<F>(&mut self, block: F) -> &mut Self
    where
        F: FnOnce(&mut StatementCollector),
    {
        self.up = collect(block);
        self
    }

    /// Define the reverse statements
    pub fn down<F>(&mut self, block: F) -> &mut Self
    where
        F: FnOnce(&mut StatementCollector),
    {
        self.down = collect(block);
        self
    }

    /// Freeze the collected statements into a migration
    pub fn build(self) -> Migration {
        Migration {
            up: self.up,
            down: self.down,
        }
    }
}

fn collect<F>(block: F) -> Vec<String>
where
    F: FnOnce(&mut StatementCollector),
{
    let mut collector = StatementCollector::default();
    block(&mut collector);
    collector.into_statements()
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;

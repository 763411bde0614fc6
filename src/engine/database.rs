//! The table catalog.

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{ColumnDef, Statement};
use crate::engine::table::Table;
use crate::error::{DbError, DbResult};
use crate::executor;
use crate::result::ExecResult;

/// An in-memory collection of tables, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: HashMap<String, Table>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table, failing if one of the same name already exists.
    pub fn create_table(&mut self, name: &str, columns: Vec<ColumnDef>) -> DbResult<()> {
        if self.tables.contains_key(name) {
            return Err(DbError::TableExists(name.to_string()));
        }
        let table = Table::new(name, columns)?;
        debug!(table = name, "created table");
        self.tables.insert(name.to_string(), table);
        Ok(())
    }

    /// Looks up a table for reading.
    pub fn table(&self, name: &str) -> DbResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| DbError::UnknownTable(name.to_string()))
    }

    /// Looks up a table for mutation.
    pub fn table_mut(&mut self, name: &str) -> DbResult<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DbError::UnknownTable(name.to_string()))
    }

    /// Parses and runs a single statement, reporting any failure
    /// through the returned [`ExecResult`] rather than as an `Err` —
    /// this keeps a REPL-style caller from having to match on a
    /// `Result` for every statement it runs.
    #[must_use]
    pub fn execute(&mut self, text: &str) -> ExecResult {
        executor::execute(self, text)
    }

    /// Runs an already-parsed statement, e.g. one built by a caller
    /// that wants to skip the text-parsing step.
    #[must_use]
    pub fn execute_stmt(&mut self, stmt: &Statement) -> ExecResult {
        executor::execute_stmt(self, stmt.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creating_the_same_table_twice_fails() {
        let mut db = Database::new();
        db.create_table("t", vec![]).unwrap();
        assert!(matches!(db.create_table("t", vec![]), Err(DbError::TableExists(_))));
    }

    #[test]
    fn unknown_table_lookup_fails() {
        let db = Database::new();
        assert!(matches!(db.table("missing"), Err(DbError::UnknownTable(_))));
    }
}

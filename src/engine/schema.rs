//! A table's column layout.

use std::collections::HashMap;

use crate::ast::ColumnDef;
use crate::error::DbError;

/// The ordered column list of a table, plus a name-to-position index
/// for fast lookup.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    positions: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from parsed column definitions.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, DbError> {
        let mut positions = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if positions.insert(col.name.clone(), i).is_some() {
                return Err(DbError::DuplicateAssignment(col.name.clone()));
            }
        }
        Ok(Self { columns, positions })
    }

    /// The number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// `true` if the schema has no columns (never the case for a
    /// successfully created table, but useful for `Default`-style checks).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Every column, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// The column at `position`.
    #[must_use]
    pub fn column_at(&self, position: usize) -> Option<&ColumnDef> {
        self.columns.get(position)
    }

    /// The column named `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.positions.get(name).and_then(|&i| self.columns.get(i))
    }

    /// The position of column `name`, or an [`DbError::UnknownColumn`].
    pub fn position_of(&self, name: &str) -> Result<usize, DbError> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| DbError::UnknownColumn(name.to_string()))
    }

    /// `true` if `name` names a column of this schema.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }
}

//! Column definitions, as produced by `CREATE TABLE` parsing.

use crate::error::DbError;
use crate::value::ValueKind;

/// One column of a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// The column's name.
    pub name: String,
    /// The declared value case.
    pub kind: ValueKind,
    /// `UNIQUE` — every row must have a distinct value in this column.
    pub is_unique: bool,
    /// `KEY` — like `UNIQUE`, but also makes the column immutable via `UPDATE`.
    pub is_key: bool,
    /// `AUTOINCREMENT` — the column has an implicit per-table counter.
    pub is_auto_increment: bool,
    /// The raw source text of a `DEFAULT` expression, if any.
    pub default_expression: Option<String>,
}

impl ColumnDef {
    /// Creates a plain column with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_unique: false,
            is_key: false,
            is_auto_increment: false,
            default_expression: None,
        }
    }

    /// Validates the combination of flags collected while parsing this
    /// column, rejecting combinations the engine cannot support:
    /// `AUTOINCREMENT` is only meaningful on `INT` columns, and a
    /// column cannot carry both a `DEFAULT` and `AUTOINCREMENT`.
    pub fn validate(&self) -> Result<(), DbError> {
        if self.is_auto_increment && self.kind != ValueKind::Int {
            return Err(DbError::TypeMismatch(format!(
                "column `{}` is AUTOINCREMENT but declared {}, expected INT",
                self.name, self.kind
            )));
        }
        if self.is_auto_increment && self.default_expression.is_some() {
            return Err(DbError::TypeMismatch(format!(
                "column `{}` cannot be both AUTOINCREMENT and DEFAULT",
                self.name
            )));
        }
        Ok(())
    }

    /// A column is "protected" against `UPDATE` if it is a key,
    /// auto-increment, or unique column — those are immutable after
    /// insert.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        self.is_key || self.is_auto_increment || self.is_unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_auto_increment_on_non_int() {
        let mut col = ColumnDef::new("name", ValueKind::Varchar);
        col.is_auto_increment = true;
        assert!(col.validate().is_err());
    }

    #[test]
    fn rejects_default_with_auto_increment() {
        let mut col = ColumnDef::new("id", ValueKind::Int);
        col.is_auto_increment = true;
        col.default_expression = Some("1".to_string());
        assert!(col.validate().is_err());
    }

    #[test]
    fn key_and_auto_increment_are_protected() {
        let mut key_col = ColumnDef::new("id", ValueKind::Int);
        key_col.is_key = true;
        assert!(key_col.is_protected());

        let plain = ColumnDef::new("name", ValueKind::Varchar);
        assert!(!plain.is_protected());
    }

    #[test]
    fn plain_unique_column_is_protected() {
        let mut unique_only = ColumnDef::new("email", ValueKind::Varchar);
        unique_only.is_unique = true;
        assert!(unique_only.is_protected());
    }
}

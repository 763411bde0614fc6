//! The executor's output type.

use std::fmt;

use crate::error::DbError;
use crate::value::Value;

/// One projected row: an ordered list of (column name, value) pairs.
///
/// Ordered, not a map, so `SELECT a, b` and `SELECT b, a` are
/// distinguishable in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow(Vec<(String, Value)>);

impl ResultRow {
    /// Wraps an ordered list of projected columns.
    #[must_use]
    pub const fn new(columns: Vec<(String, Value)>) -> Self {
        Self(columns)
    }

    /// Looks up a projected column by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The row's columns, in projection order.
    #[must_use]
    pub fn columns(&self) -> &[(String, Value)] {
        &self.0
    }
}

/// The outcome of [`crate::Database::execute`]: either the rows a
/// `SELECT` projected (empty for every other statement kind that
/// succeeded), or the error that aborted the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecResult {
    outcome: Result<Vec<ResultRow>, DbError>,
}

impl ExecResult {
    pub(crate) fn ok(rows: Vec<ResultRow>) -> Self {
        Self { outcome: Ok(rows) }
    }

    pub(crate) fn err(error: DbError) -> Self {
        Self { outcome: Err(error) }
    }

    /// `true` if the statement succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The error message, if the statement failed.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.outcome.as_ref().err().map(ToString::to_string)
    }

    /// The projected rows, empty both for non-`SELECT` statements and
    /// for a failed statement.
    #[must_use]
    pub fn payload(&self) -> &[ResultRow] {
        self.outcome.as_deref().unwrap_or(&[])
    }

    /// Iterates over the projected rows.
    pub fn rows(&self) -> impl Iterator<Item = &ResultRow> {
        self.payload().iter()
    }
}

impl fmt::Display for ExecResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(rows) => write!(f, "ok, {} row(s)", rows.len()),
            Err(e) => write!(f, "error: {e}"),
        }
    }
}

impl<'a> IntoIterator for &'a ExecResult {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.payload().iter()
    }
}

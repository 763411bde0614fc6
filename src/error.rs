//! Crate-wide error type.
//!
//! Every failure raised by the lexer, parser, evaluator, or table
//! engine is a [`DbError`] variant. The executor is the only place
//! that catches these and turns them into an [`ExecResult`](crate::ExecResult);
//! nothing below it ever panics on malformed input.

use thiserror::Error;

/// A single error domain shared by every component of the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DbError {
    /// The statement text could not be parsed.
    #[error("syntax error at position {position}: {message}")]
    ParseStatement {
        /// Human-readable description of what went wrong.
        message: String,
        /// Byte offset into the statement text.
        position: usize,
    },

    /// An expression or predicate could not be parsed by the evaluator.
    #[error("could not parse expression `{expression}`: {message}")]
    ParseExpression {
        /// The offending expression text.
        expression: String,
        /// Human-readable description of what went wrong.
        message: String,
    },

    /// A statement referenced a table that does not exist.
    #[error("unknown table `{0}`")]
    UnknownTable(String),

    /// A statement referenced a column that does not exist.
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// An expression referenced an identifier that could not be resolved.
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),

    /// `CREATE TABLE` named a table that already exists.
    #[error("table `{0}` already exists")]
    TableExists(String),

    /// A value's case did not match the column's declared type, or an
    /// operator was applied to incompatible operand cases.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A positional `INSERT` supplied more values than the schema has columns.
    #[error("too many values: expected at most {expected}, got {got}")]
    TooManyValues {
        /// Number of columns in the schema.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// A column had no value, no default, and is not auto-increment.
    #[error("missing value for column `{0}`")]
    MissingValue(String),

    /// The same column was assigned twice in a named insert or update.
    #[error("duplicate assignment to column `{0}`")]
    DuplicateAssignment(String),

    /// An `is_unique` column collided with an existing row.
    #[error("unique constraint violated on column `{column}` (value `{value}`)")]
    UniqueViolation {
        /// The column with the `UNIQUE` constraint.
        column: String,
        /// The stringified colliding value.
        value: String,
    },

    /// An `is_key` column collided with an existing row.
    #[error("key constraint violated on column `{column}` (value `{value}`)")]
    KeyViolation {
        /// The column with the `KEY` constraint.
        column: String,
        /// The stringified colliding value.
        value: String,
    },

    /// An explicit value for an auto-increment column was below the
    /// column's current counter.
    #[error(
        "auto-increment regression on column `{column}`: value {value} is below counter {counter}"
    )]
    AutoIncrementRegression {
        /// The auto-increment column.
        column: String,
        /// The explicit value that was supplied.
        value: i64,
        /// The column's counter at the time of the attempted insert.
        counter: i64,
    },

    /// An `UPDATE` tried to assign to an auto-increment, key, or unique column.
    #[error("column `{0}` is protected and cannot be updated")]
    ProtectedColumn(String),

    /// Division or modulo by zero.
    #[error("division by zero")]
    DivByZero,

    /// `CREATE INDEX` used an unrecognized index kind.
    #[error("unknown index kind `{0}`")]
    BadIndexKind(String),

    /// `CREATE INDEX` was given no columns, or columns outside the schema.
    #[error("bad index columns: {0}")]
    BadIndexColumns(String),
}

/// Convenience alias used throughout the engine.
pub type DbResult<T> = Result<T, DbError>;

//! The statement tree.
//!
//! Expressions, defaults, and predicates are **not** parsed into a
//! sub-tree here — they are captured as raw source substrings and
//! handed to [`crate::eval`] at execution time. This keeps the parser
//! a single grammar (statement shape) instead of two grammars glued
//! together, and matches the way the evaluator needs the original
//! text anyway (re-tokenizing against a fresh identifier environment
//! for every row).

use crate::ast::column::ColumnDef;
use crate::ast::index::IndexKind;

/// How a single `VALUES (...)` entry or column in a named insert
/// supplies its value.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertMode {
    /// `INSERT INTO t VALUES (1, "a", NULL)` — values line up
    /// positionally with the schema. An empty slot (two commas with
    /// nothing between them, or a lone `NULL`) asks the engine to
    /// resolve the value itself (auto-increment, default, or typed zero).
    Positional(Vec<Option<String>>),
    /// `INSERT INTO t (a, b) VALUES (1, 2)` — each column is named
    /// explicitly; columns not mentioned fall back to their default or
    /// auto-increment behavior exactly as in the positional form.
    Named(Vec<(String, String)>),
}

/// One column reference in a `SELECT` list, optionally qualified by
/// table name (relevant only when the statement has a `JOIN`).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    /// The table the column is qualified with, e.g. `t` in `t.x`.
    pub table: Option<String>,
    /// The column name, or `*` for every column.
    pub column: String,
}

/// A `JOIN` clause: the table being joined in, and the raw `ON`
/// predicate text evaluated per candidate row pair.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// The table being joined.
    pub table: String,
    /// The raw `ON` predicate source text.
    pub on_predicate: String,
}

/// A fully parsed statement, ready for the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `CREATE TABLE name (col1 TYPE [constraints], ...)`
    CreateTable {
        /// The new table's name.
        table: String,
        /// Its columns, in declaration order.
        columns: Vec<ColumnDef>,
    },
    /// `CREATE ORDERED|UNORDERED INDEX ON table BY col1, col2, ...`
    CreateIndex {
        /// The table the index is built over.
        table: String,
        /// `ORDERED` or `UNORDERED`.
        kind: IndexKind,
        /// The indexed columns, in declaration order.
        columns: Vec<String>,
    },
    /// `INSERT INTO table [(\"cols\")] VALUES (...)`
    Insert {
        /// The target table.
        table: String,
        /// How the supplied values map to columns.
        mode: InsertMode,
    },
    /// `SELECT cols FROM table [JOIN other ON pred] [WHERE pred]`
    Select {
        /// The projected columns, or a single `*` entry for all.
        columns: Vec<SelectColumn>,
        /// The primary table.
        table: String,
        /// An optional join against a second table.
        join: Option<JoinClause>,
        /// The raw `WHERE` predicate source text, if any.
        predicate: Option<String>,
    },
    /// `UPDATE table SET col1 = expr1, ... [WHERE pred]`
    Update {
        /// The target table.
        table: String,
        /// Column-to-expression assignments, in source order.
        assignments: Vec<(String, String)>,
        /// The raw `WHERE` predicate source text, if any.
        predicate: Option<String>,
    },
    /// `DELETE FROM table [WHERE pred]`
    Delete {
        /// The target table.
        table: String,
        /// The raw `WHERE` predicate source text, if any.
        predicate: Option<String>,
    },
}

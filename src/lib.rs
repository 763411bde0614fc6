//! An embedded, single-process, in-memory SQL-like database engine.
//!
//! There is no persistence, no transactions, and no concurrency: a
//! [`Database`] is a plain Rust value holding a catalog of tables, and
//! every statement runs to completion synchronously against it.
//!
//! ```
//! use minisql_engine::Database;
//!
//! let mut db = Database::new();
//! db.execute("CREATE TABLE users (id INT AUTOINCREMENT KEY, name VARCHAR UNIQUE)");
//! db.execute("INSERT INTO users VALUES (, \"ada\")");
//! let result = db.execute("SELECT * FROM users WHERE name == \"ada\"");
//! assert!(result.is_ok());
//! assert_eq!(result.payload().len(), 1);
//! ```

pub mod ast;
pub mod engine;
pub mod error;
pub mod eval;
mod executor;
mod lexer;
pub mod parser;
mod result;
pub mod value;

pub use engine::Database;
pub use error::{DbError, DbResult};
pub use result::{ExecResult, ResultRow};
pub use value::{Value, ValueKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_create_insert_select() {
        let mut db = Database::new();
        assert!(db
            .execute("CREATE TABLE t (id INT AUTOINCREMENT KEY, label VARCHAR)")
            .is_ok());
        assert!(db.execute("INSERT INTO t VALUES (, \"x\")").is_ok());
        let result = db.execute("SELECT * FROM t");
        assert!(result.is_ok());
        assert_eq!(result.payload().len(), 1);
    }

    #[test]
    fn syntax_error_is_reported_through_exec_result_not_a_panic() {
        let mut db = Database::new();
        let result = db.execute("CREATE TBL t (id INT)");
        assert!(!result.is_ok());
        assert!(result.error_message().is_some());
    }
}

//! The parsed statement tree and its building blocks.

pub mod column;
pub mod index;
pub mod statement;

pub use column::ColumnDef;
pub use index::IndexKind;
pub use statement::{InsertMode, JoinClause, SelectColumn, Statement};

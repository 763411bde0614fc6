//! The in-memory table engine: schemas, rows, constraints, and indexes.

mod database;
mod index;
mod row;
mod schema;
mod table;

pub use database::Database;
pub use index::Index;
pub use row::Row;
pub use schema::Schema;
pub use table::Table;

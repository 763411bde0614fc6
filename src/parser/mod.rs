//! Turns statement text into a [`crate::ast::Statement`].

mod parser;

pub use parser::parse_statement;

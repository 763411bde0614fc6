//! Character-cursor scanning primitives and the statement keyword table.
//!
//! There is no separate tokenize-then-parse pass: expression and
//! predicate text must be captured as raw substrings (see
//! [`crate::eval`]), which does not fit cleanly behind a pre-built
//! token stream. Instead the parser drives a [`Cursor`] directly,
//! consulting [`Keyword`] only when it expects a reserved word.

pub mod cursor;
pub mod keyword;
pub mod span;

pub use cursor::Cursor;
pub use keyword::Keyword;
pub use span::Span;

//! The statement-level keyword set.
//!
//! Unlike a general-purpose SQL dialect, keyword matching here is
//! **case-sensitive** and requires a following word boundary
//! (whitespace, punctuation, or end of input) — matching spec-required
//! behavior rather than ANSI SQL's case-insensitivity.

/// A reserved word recognized at the statement-grammar level.
///
/// Expression/predicate text is never tokenized into these — it is
/// captured as a raw substring and handed to the evaluator (see
/// [`crate::eval`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Create,
    Table,
    Index,
    Ordered,
    Unordered,
    On,
    By,
    Insert,
    Into,
    Values,
    Select,
    From,
    Join,
    Where,
    Update,
    Set,
    Delete,
    Int,
    Double,
    Bool,
    Varchar,
    Bytebuffer,
    Unique,
    Key,
    Autoincrement,
    Default,
}

impl Keyword {
    /// Matches a word against the keyword table. Case-sensitive.
    #[must_use]
    pub fn from_str(word: &str) -> Option<Self> {
        Some(match word {
            "CREATE" => Self::Create,
            "TABLE" => Self::Table,
            "INDEX" => Self::Index,
            "ORDERED" => Self::Ordered,
            "UNORDERED" => Self::Unordered,
            "ON" => Self::On,
            "BY" => Self::By,
            "INSERT" => Self::Insert,
            "INTO" => Self::Into,
            "VALUES" => Self::Values,
            "SELECT" => Self::Select,
            "FROM" => Self::From,
            "JOIN" => Self::Join,
            "WHERE" => Self::Where,
            "UPDATE" => Self::Update,
            "SET" => Self::Set,
            "DELETE" => Self::Delete,
            "INT" => Self::Int,
            "DOUBLE" => Self::Double,
            "BOOL" => Self::Bool,
            "VARCHAR" => Self::Varchar,
            "BYTEBUFFER" => Self::Bytebuffer,
            "UNIQUE" => Self::Unique,
            "KEY" => Self::Key,
            "AUTOINCREMENT" => Self::Autoincrement,
            "DEFAULT" => Self::Default,
            _ => return None,
        })
    }

    /// Returns the keyword's canonical spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Table => "TABLE",
            Self::Index => "INDEX",
            Self::Ordered => "ORDERED",
            Self::Unordered => "UNORDERED",
            Self::On => "ON",
            Self::By => "BY",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Join => "JOIN",
            Self::Where => "WHERE",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Int => "INT",
            Self::Double => "DOUBLE",
            Self::Bool => "BOOL",
            Self::Varchar => "VARCHAR",
            Self::Bytebuffer => "BYTEBUFFER",
            Self::Unique => "UNIQUE",
            Self::Key => "KEY",
            Self::Autoincrement => "AUTOINCREMENT",
            Self::Default => "DEFAULT",
        }
    }
}

//! Character-cursor primitives shared by the statement parser.
//!
//! The grammar is small enough, and enough of it (expressions,
//! predicates, default-value text) needs raw substring capture rather
//! than tokenization, that there is no separate token-stream pass: the
//! parser drives this cursor directly.

use crate::lexer::span::Span;

/// A position-tracking cursor over the statement text.
///
/// Works on bytes for position-keeping (spans are byte offsets) but
/// exposes `char`-based peeking so multi-byte input is handled
/// correctly.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of `text`.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The unconsumed remainder of the input.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// `true` once every byte has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the next one, without consuming either.
    #[must_use]
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Consumes and returns the next character.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `c` if it is next, returning whether it matched.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips whitespace.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Scans a run of identifier characters (`[A-Za-z_][A-Za-z0-9_]*`),
    /// returning the matched slice. Assumes `skip_whitespace` was
    /// already called and the cursor sits on the first character.
    #[must_use]
    pub fn scan_identifier(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.advance();
            }
            _ => return None,
        }
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        Some(&self.text[start..self.pos])
    }

    /// Scans a numeric literal (`-?[0-9]+(\.[0-9]+)?`), returning the
    /// matched slice. The leading sign, if any, must already be
    /// positioned under the cursor.
    #[must_use]
    pub fn scan_number(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.pos == digits_start {
            self.pos = start;
            return None;
        }
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        Some(&self.text[start..self.pos])
    }

    /// Scans a double-quoted string literal, including the quotes,
    /// honoring `\` as an escape for the character that follows it.
    /// Returns the inner content (quotes stripped, escapes resolved) or
    /// `None` if the cursor is not positioned on an opening quote or
    /// the string is unterminated.
    pub fn scan_string_literal(&mut self) -> Option<String> {
        if self.peek() != Some('"') {
            return None;
        }
        self.advance();
        let mut out = String::new();
        loop {
            match self.advance()? {
                '\\' => out.push(self.advance()?),
                '"' => return Some(out),
                c => out.push(c),
            }
        }
    }

    /// Skips a double-quoted string literal without interpreting its
    /// content, leaving quotes and escapes untouched in the source.
    /// Used when capturing raw expression/predicate text, where the
    /// evaluator (not the statement parser) owns string unescaping.
    /// Returns `false` if the cursor was not on an opening quote or the
    /// string was unterminated (cursor still advances to end of input).
    pub fn skip_string_literal_raw(&mut self) -> bool {
        if self.peek() != Some('"') {
            return false;
        }
        self.advance();
        loop {
            match self.advance() {
                None => return false,
                Some('\\') => {
                    if self.advance().is_none() {
                        return false;
                    }
                }
                Some('"') => return true,
                Some(_) => {}
            }
        }
    }

    /// Repositions the cursor at an earlier byte offset obtained from
    /// [`Cursor::position`]. Used to "un-consume" a word that turned
    /// out to be a stop keyword rather than part of captured text.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Returns the zero-width span at the current position.
    #[must_use]
    pub const fn here(&self) -> Span {
        Span::new(self.pos, self.pos)
    }
}

//! Recursive-descent parser over a character cursor.
//!
//! Expressions, `DEFAULT` text, `SET` right-hand sides, and `WHERE`/`ON`
//! predicates are captured as raw source substrings — paren depth and
//! embedded string literals are tracked so commas and closing parens
//! inside them don't terminate the capture early — and handed
//! untouched to [`crate::eval`], which re-tokenizes them at execution
//! time against each row's identifier environment.

use crate::ast::{ColumnDef, IndexKind, InsertMode, JoinClause, SelectColumn, Statement};
use crate::error::{DbError, DbResult};
use crate::lexer::{Cursor, Keyword};
use crate::value::ValueKind;

/// Parses a single statement from `text`.
pub fn parse_statement(text: &str) -> DbResult<Statement> {
    let mut parser = Parser::new(text);
    let stmt = parser.parse_statement()?;
    parser.cursor.skip_whitespace();
    parser.cursor.eat(';');
    parser.cursor.skip_whitespace();
    if !parser.cursor.is_at_end() {
        return Err(parser.error_here("unexpected trailing input"));
    }
    Ok(stmt)
}

struct Parser<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: Cursor::new(text),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> DbError {
        DbError::ParseStatement {
            message: message.into(),
            position: self.cursor.position(),
        }
    }

    /// Looks at the next word without consuming it, matching it
    /// against the keyword table. Returns `None` for identifiers that
    /// aren't reserved words.
    fn peek_keyword(&self) -> Option<Keyword> {
        let mut probe = self.cursor.clone();
        probe.skip_whitespace();
        let word = probe.scan_identifier()?;
        Keyword::from_str(word)
    }

    fn expect_keyword(&mut self, kw: Keyword) -> DbResult<()> {
        self.cursor.skip_whitespace();
        let start = self.cursor.position();
        let word = self
            .cursor
            .scan_identifier()
            .ok_or_else(|| self.error_here(format!("expected `{}`", kw.as_str())))?;
        if Keyword::from_str(word) == Some(kw) {
            Ok(())
        } else {
            self.cursor.seek(start);
            Err(self.error_here(format!("expected `{}`, found `{word}`", kw.as_str())))
        }
    }

    fn consume_keyword_if(&mut self, kw: Keyword) -> bool {
        if self.peek_keyword() == Some(kw) {
            self.cursor.skip_whitespace();
            self.cursor.scan_identifier();
            true
        } else {
            false
        }
    }

    fn expect_identifier(&mut self) -> DbResult<&'a str> {
        self.cursor.skip_whitespace();
        if let Some(word) = self.cursor.clone().scan_identifier() {
            if Keyword::from_str(word).is_some() {
                return Err(self.error_here(format!("expected an identifier, found keyword `{word}`")));
            }
        }
        self.cursor
            .scan_identifier()
            .ok_or_else(|| self.error_here("expected an identifier"))
    }

    fn expect_char(&mut self, c: char) -> DbResult<()> {
        self.cursor.skip_whitespace();
        if self.cursor.eat(c) {
            Ok(())
        } else {
            Err(self.error_here(format!("expected `{c}`")))
        }
    }

    /// Captures raw text until, at paren depth zero, a character in
    /// `stop_chars` or one of `stop_keywords` is encountered (neither
    /// is consumed), or input ends. String literals and parenthesized
    /// groups are skipped over whole regardless of their contents.
    fn capture_raw(&mut self, stop_chars: &[char], stop_keywords: &[Keyword]) -> String {
        self.cursor.skip_whitespace();
        let start = self.cursor.position();
        let mut depth: i32 = 0;
        loop {
            match self.cursor.peek() {
                None => break,
                Some('"') => {
                    self.cursor.skip_string_literal_raw();
                }
                Some('(') => {
                    depth += 1;
                    self.cursor.advance();
                }
                Some(')') => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    self.cursor.advance();
                }
                Some(c) if depth == 0 && stop_chars.contains(&c) => break,
                Some(c) if c.is_alphabetic() || c == '_' => {
                    let word_start = self.cursor.position();
                    self.cursor.scan_identifier();
                    if depth == 0 {
                        let word = &self.text[word_start..self.cursor.position()];
                        if let Some(kw) = Keyword::from_str(word) {
                            if stop_keywords.contains(&kw) {
                                self.cursor.seek(word_start);
                                break;
                            }
                        }
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        self.text[start..self.cursor.position()].trim().to_string()
    }

    fn parse_statement(&mut self) -> DbResult<Statement> {
        match self.peek_keyword() {
            Some(Keyword::Create) => self.parse_create(),
            Some(Keyword::Insert) => self.parse_insert(),
            Some(Keyword::Select) => self.parse_select(),
            Some(Keyword::Update) => self.parse_update(),
            Some(Keyword::Delete) => self.parse_delete(),
            _ => Err(self.error_here("expected a statement keyword")),
        }
    }

    fn parse_create(&mut self) -> DbResult<Statement> {
        self.expect_keyword(Keyword::Create)?;
        match self.peek_keyword() {
            Some(Keyword::Table) => self.parse_create_table(),
            Some(Keyword::Ordered) | Some(Keyword::Unordered) => self.parse_create_index(),
            _ => Err(self.error_here("expected TABLE, ORDERED, or UNORDERED")),
        }
    }

    fn parse_create_table(&mut self) -> DbResult<Statement> {
        self.expect_keyword(Keyword::Table)?;
        let table = self.expect_identifier()?.to_string();
        self.expect_char('(')?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_def()?);
            self.cursor.skip_whitespace();
            if self.cursor.eat(',') {
                continue;
            }
            break;
        }
        self.expect_char(')')?;
        for col in &columns {
            col.validate()?;
        }
        Ok(Statement::CreateTable { table, columns })
    }

    fn parse_column_def(&mut self) -> DbResult<ColumnDef> {
        let name = self.expect_identifier()?.to_string();
        let kind = self.parse_value_kind()?;
        let mut col = ColumnDef::new(name, kind);
        loop {
            self.cursor.skip_whitespace();
            match self.peek_keyword() {
                Some(Keyword::Unique) => {
                    self.consume_keyword_if(Keyword::Unique);
                    col.is_unique = true;
                }
                Some(Keyword::Key) => {
                    self.consume_keyword_if(Keyword::Key);
                    col.is_key = true;
                    col.is_unique = true;
                }
                Some(Keyword::Autoincrement) => {
                    self.consume_keyword_if(Keyword::Autoincrement);
                    col.is_auto_increment = true;
                }
                Some(Keyword::Default) => {
                    self.consume_keyword_if(Keyword::Default);
                    let expr = self.capture_raw(&[',', ')'], &[]);
                    if expr.is_empty() {
                        return Err(self.error_here("expected an expression after DEFAULT"));
                    }
                    col.default_expression = Some(expr);
                }
                _ => break,
            }
        }
        Ok(col)
    }

    fn parse_value_kind(&mut self) -> DbResult<ValueKind> {
        self.cursor.skip_whitespace();
        let start = self.cursor.position();
        let word = self
            .cursor
            .scan_identifier()
            .ok_or_else(|| self.error_here("expected a column type"))?;
        match Keyword::from_str(word) {
            Some(Keyword::Int) => Ok(ValueKind::Int),
            Some(Keyword::Double) => Ok(ValueKind::Double),
            Some(Keyword::Bool) => Ok(ValueKind::Bool),
            Some(Keyword::Varchar) => Ok(ValueKind::Varchar),
            Some(Keyword::Bytebuffer) => Ok(ValueKind::Bytes),
            _ => {
                self.cursor.seek(start);
                Err(self.error_here(format!("unknown column type `{word}`")))
            }
        }
    }

    fn parse_create_index(&mut self) -> DbResult<Statement> {
        self.cursor.skip_whitespace();
        let start = self.cursor.position();
        let word = self
            .cursor
            .scan_identifier()
            .ok_or_else(|| self.error_here("expected ORDERED or UNORDERED"))?;
        let kind = IndexKind::from_keyword(word).map_err(|_| {
            self.error_here_at(start, format!("expected ORDERED or UNORDERED, found `{word}`"))
        })?;
        self.expect_keyword(Keyword::Index)?;
        self.expect_keyword(Keyword::On)?;
        let table = self.expect_identifier()?.to_string();
        self.expect_keyword(Keyword::By)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.expect_identifier()?.to_string());
            self.cursor.skip_whitespace();
            if self.cursor.eat(',') {
                continue;
            }
            break;
        }
        if columns.is_empty() {
            return Err(self.error_here("CREATE INDEX requires at least one column"));
        }
        Ok(Statement::CreateIndex { table, kind, columns })
    }

    fn error_here_at(&self, position: usize, message: impl Into<String>) -> DbError {
        DbError::ParseStatement {
            message: message.into(),
            position,
        }
    }

    fn parse_insert(&mut self) -> DbResult<Statement> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.expect_identifier()?.to_string();
        self.cursor.skip_whitespace();

        let named_columns = if self.cursor.peek() == Some('(') {
            self.expect_char('(')?;
            let mut names = Vec::new();
            loop {
                names.push(self.expect_identifier()?.to_string());
                self.cursor.skip_whitespace();
                if self.cursor.eat(',') {
                    continue;
                }
                break;
            }
            self.expect_char(')')?;
            Some(names)
        } else {
            None
        };

        self.expect_keyword(Keyword::Values)?;
        self.expect_char('(')?;
        let mut values = Vec::new();
        loop {
            let raw = self.capture_raw(&[',', ')'], &[]);
            values.push(if raw.is_empty() || raw == "NULL" {
                None
            } else {
                Some(raw)
            });
            self.cursor.skip_whitespace();
            if self.cursor.eat(',') {
                continue;
            }
            break;
        }
        self.expect_char(')')?;

        let mode = match named_columns {
            Some(names) => {
                if names.len() != values.len() {
                    return Err(self.error_here(format!(
                        "expected {} values for {} named columns, got {}",
                        names.len(),
                        names.len(),
                        values.len()
                    )));
                }
                let mut assignments = Vec::with_capacity(names.len());
                for (name, value) in names.into_iter().zip(values) {
                    let expr = value.ok_or_else(|| {
                        self.error_here(format!("missing value for column `{name}`"))
                    })?;
                    assignments.push((name, expr));
                }
                InsertMode::Named(assignments)
            }
            None => InsertMode::Positional(values),
        };

        Ok(Statement::Insert { table, mode })
    }

    fn parse_select(&mut self) -> DbResult<Statement> {
        self.expect_keyword(Keyword::Select)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_select_column()?);
            self.cursor.skip_whitespace();
            if self.cursor.eat(',') {
                continue;
            }
            break;
        }
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier()?.to_string();

        let join = if self.consume_keyword_if(Keyword::Join) {
            let join_table = self.expect_identifier()?.to_string();
            self.expect_keyword(Keyword::On)?;
            let on_predicate = self.capture_raw(&[';'], &[Keyword::Where]);
            Some(JoinClause {
                table: join_table,
                on_predicate,
            })
        } else {
            None
        };

        let predicate = if self.consume_keyword_if(Keyword::Where) {
            Some(self.capture_raw(&[';'], &[]))
        } else {
            None
        };

        Ok(Statement::Select {
            columns,
            table,
            join,
            predicate,
        })
    }

    fn parse_select_column(&mut self) -> DbResult<SelectColumn> {
        self.cursor.skip_whitespace();
        if self.cursor.eat('*') {
            return Ok(SelectColumn {
                table: None,
                column: "*".to_string(),
            });
        }
        let first = self.expect_identifier()?.to_string();
        if self.cursor.peek() == Some('.') {
            self.cursor.advance();
            let column = self.expect_identifier()?.to_string();
            Ok(SelectColumn {
                table: Some(first),
                column,
            })
        } else {
            Ok(SelectColumn {
                table: None,
                column: first,
            })
        }
    }

    fn parse_update(&mut self) -> DbResult<Statement> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.expect_identifier()?.to_string();
        self.expect_keyword(Keyword::Set)?;
        let mut assignments = Vec::new();
        loop {
            let column = self.expect_identifier()?.to_string();
            self.expect_char('=')?;
            let expr = self.capture_raw(&[',', ';'], &[Keyword::Where]);
            if expr.is_empty() {
                return Err(self.error_here(format!("expected an expression for column `{column}`")));
            }
            assignments.push((column, expr));
            self.cursor.skip_whitespace();
            if self.cursor.eat(',') {
                continue;
            }
            break;
        }
        let predicate = if self.consume_keyword_if(Keyword::Where) {
            Some(self.capture_raw(&[';'], &[]))
        } else {
            None
        };
        Ok(Statement::Update {
            table,
            assignments,
            predicate,
        })
    }

    fn parse_delete(&mut self) -> DbResult<Statement> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.expect_identifier()?.to_string();
        let predicate = if self.consume_keyword_if(Keyword::Where) {
            Some(self.capture_raw(&[';'], &[]))
        } else {
            None
        };
        Ok(Statement::Delete { table, predicate })
    }
}

//! Tokenizes expression/predicate text into [`ExprToken`]s.

use crate::error::DbError;
use crate::eval::token::{ExprToken, Op};
use crate::lexer::Cursor;
use crate::value::Value;

/// Tokenizes `expr`. Returns a [`DbError::ParseExpression`] on any
/// unrecognized character or unterminated string.
pub fn tokenize(expr: &str) -> Result<Vec<ExprToken>, DbError> {
    let mut cursor = Cursor::new(expr);
    let mut tokens = Vec::new();
    loop {
        cursor.skip_whitespace();
        let Some(c) = cursor.peek() else { break };
        let token = match c {
            '(' => {
                cursor.advance();
                ExprToken::LParen
            }
            ')' => {
                cursor.advance();
                ExprToken::RParen
            }
            '"' => {
                let s = cursor.scan_string_literal().ok_or_else(|| parse_err(expr, "unterminated string literal"))?;
                ExprToken::Literal(Value::Str(s))
            }
            '0'..='9' => {
                let text = cursor
                    .scan_number()
                    .ok_or_else(|| parse_err(expr, "malformed numeric literal"))?;
                ExprToken::Literal(parse_numeric_literal(text))
            }
            '-' if is_unary_position(&tokens) => {
                cursor.advance();
                if matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
                    let text = cursor
                        .scan_number()
                        .map(|t| format!("-{t}"))
                        .ok_or_else(|| parse_err(expr, "malformed numeric literal"))?;
                    ExprToken::Literal(parse_numeric_literal(&text))
                } else {
                    ExprToken::Op(Op::Negate)
                }
            }
            '-' => {
                cursor.advance();
                ExprToken::Op(Op::Sub)
            }
            '+' => {
                cursor.advance();
                ExprToken::Op(Op::Add)
            }
            '*' => {
                cursor.advance();
                ExprToken::Op(Op::Mul)
            }
            '/' => {
                cursor.advance();
                ExprToken::Op(Op::Div)
            }
            '%' => {
                cursor.advance();
                ExprToken::Op(Op::Mod)
            }
            '<' => {
                cursor.advance();
                if cursor.eat('=') {
                    ExprToken::Op(Op::Le)
                } else {
                    ExprToken::Op(Op::Lt)
                }
            }
            '>' => {
                cursor.advance();
                if cursor.eat('=') {
                    ExprToken::Op(Op::Ge)
                } else {
                    ExprToken::Op(Op::Gt)
                }
            }
            '=' => {
                cursor.advance();
                if cursor.eat('=') {
                    ExprToken::Op(Op::Eq)
                } else {
                    return Err(parse_err(expr, "expected `==`"));
                }
            }
            '!' => {
                cursor.advance();
                if cursor.eat('=') {
                    ExprToken::Op(Op::Ne)
                } else {
                    return Err(parse_err(expr, "expected `!=`"));
                }
            }
            '&' => {
                cursor.advance();
                if cursor.eat('&') {
                    ExprToken::Op(Op::And)
                } else {
                    return Err(parse_err(expr, "expected `&&`"));
                }
            }
            '|' => {
                cursor.advance();
                if cursor.eat('|') {
                    ExprToken::Op(Op::Or)
                } else {
                    return Err(parse_err(expr, "expected `||`"));
                }
            }
            '^' => {
                cursor.advance();
                if cursor.eat('^') {
                    ExprToken::Op(Op::Xor)
                } else {
                    return Err(parse_err(expr, "expected `^^`"));
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let ident = cursor
                    .scan_identifier()
                    .expect("leading char already confirmed identifier-start");
                match ident {
                    "true" => ExprToken::Literal(Value::Bool(true)),
                    "false" => ExprToken::Literal(Value::Bool(false)),
                    _ => ExprToken::Ident(ident.to_string()),
                }
            }
            other => return Err(parse_err(expr, format!("unexpected character `{other}`"))),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// A `-` is unary when it opens the expression or follows another
/// operator or an open paren; otherwise it is binary subtraction.
fn is_unary_position(tokens: &[ExprToken]) -> bool {
    matches!(tokens.last(), None | Some(ExprToken::Op(_)) | Some(ExprToken::LParen))
}

fn parse_numeric_literal(text: &str) -> Value {
    if text.contains('.') {
        Value::Double(text.parse().unwrap_or(f64::NAN))
    } else {
        text.parse::<i64>().map_or_else(|_| Value::Double(text.parse().unwrap_or(f64::NAN)), Value::Int)
    }
}

fn parse_err(expr: &str, message: impl Into<String>) -> DbError {
    DbError::ParseExpression {
        expression: expr.to_string(),
        message: message.into(),
    }
}

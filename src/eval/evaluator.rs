//! Shunting-yard expression evaluation.
//!
//! Infix tokens are converted to postfix (Dijkstra's algorithm) and
//! then reduced against a value stack, exactly as the calculator this
//! evaluator is modeled on does it. Identifiers are resolved through
//! `env`, which the table engine populates with every column of the
//! row currently under evaluation (see `Table::row_env`).

use std::collections::HashMap;

use tracing::trace;

use crate::error::DbError;
use crate::eval::token::{ExprToken, Op};
use crate::eval::tokenizer::tokenize;
use crate::value::{PromotedNumeric, Value};

/// The identifier environment an expression is evaluated against:
/// column name to that row's value.
pub type Env = HashMap<String, Value>;

/// Evaluates `expr` against `env`, returning the resulting value.
pub fn evaluate(expr: &str, env: &Env) -> Result<Value, DbError> {
    let tokens = tokenize(expr)?;
    let postfix = to_postfix(expr, tokens)?;
    trace!(expr, ?postfix, "evaluating postfix expression");
    eval_postfix(expr, &postfix, env)
}

/// Evaluates `expr` and requires the result to be a [`Value::Bool`],
/// as every `WHERE`/`ON` predicate must produce.
pub fn evaluate_predicate(expr: &str, env: &Env) -> Result<bool, DbError> {
    match evaluate(expr, env)? {
        Value::Bool(b) => Ok(b),
        other => Err(DbError::TypeMismatch(format!(
            "predicate `{expr}` evaluated to {} instead of BOOL",
            other.kind()
        ))),
    }
}

fn to_postfix(expr: &str, tokens: Vec<ExprToken>) -> Result<Vec<ExprToken>, DbError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<ExprToken> = Vec::new();

    for tok in tokens {
        match tok {
            ExprToken::Literal(_) | ExprToken::Ident(_) => output.push(tok),
            ExprToken::Op(op) => {
                while let Some(ExprToken::Op(top)) = ops.last() {
                    if top.precedence() >= op.precedence() {
                        output.push(ops.pop().expect("just peeked"));
                    } else {
                        break;
                    }
                }
                ops.push(ExprToken::Op(op));
            }
            ExprToken::LParen => ops.push(tok),
            ExprToken::RParen => loop {
                match ops.pop() {
                    Some(ExprToken::LParen) => break,
                    Some(other) => output.push(other),
                    None => return Err(parse_err(expr, "mismatched parentheses")),
                }
            },
        }
    }

    while let Some(top) = ops.pop() {
        if matches!(top, ExprToken::LParen) {
            return Err(parse_err(expr, "mismatched parentheses"));
        }
        output.push(top);
    }

    Ok(output)
}

fn eval_postfix(expr: &str, postfix: &[ExprToken], env: &Env) -> Result<Value, DbError> {
    let mut stack: Vec<Value> = Vec::new();

    for tok in postfix {
        match tok {
            ExprToken::Literal(v) => stack.push(v.clone()),
            ExprToken::Ident(name) => {
                let v = env
                    .get(name)
                    .ok_or_else(|| DbError::UnknownIdentifier(name.clone()))?;
                stack.push(v.clone());
            }
            ExprToken::Op(op) if op.is_unary() => {
                let operand = stack.pop().ok_or_else(|| malformed(expr))?;
                stack.push(apply_negate(operand)?);
            }
            ExprToken::Op(op) => {
                let rhs = stack.pop().ok_or_else(|| malformed(expr))?;
                let lhs = stack.pop().ok_or_else(|| malformed(expr))?;
                stack.push(apply_binary(*op, lhs, rhs)?);
            }
            ExprToken::LParen | ExprToken::RParen => unreachable!("parens never survive to_postfix"),
        }
    }

    match stack.len() {
        1 => Ok(stack.pop().expect("length checked")),
        _ => Err(malformed(expr)),
    }
}

fn apply_negate(v: Value) -> Result<Value, DbError> {
    match v {
        Value::Int(i) => Ok(Value::Int(-i)),
        Value::Double(d) => Ok(Value::Double(-d)),
        other => Err(DbError::TypeMismatch(format!(
            "cannot negate {}",
            other.kind()
        ))),
    }
}

fn apply_binary(op: Op, lhs: Value, rhs: Value) -> Result<Value, DbError> {
    match op {
        Op::Add => apply_add(lhs, rhs),
        Op::Sub => apply_numeric(lhs, rhs, |a, b| a - b, |a, b| a - b),
        Op::Mul => apply_numeric(lhs, rhs, |a, b| a * b, |a, b| a * b),
        Op::Div => apply_div(lhs, rhs),
        Op::Mod => apply_mod(lhs, rhs),
        Op::And => apply_bool(lhs, rhs, |a, b| a && b),
        Op::Or => apply_bool(lhs, rhs, |a, b| a || b),
        Op::Xor => apply_bool(lhs, rhs, |a, b| a != b),
        Op::Eq => apply_eq(lhs, rhs).map(Value::Bool),
        Op::Ne => apply_eq(lhs, rhs).map(|b| Value::Bool(!b)),
        Op::Lt => apply_cmp(lhs, rhs, std::cmp::Ordering::is_lt),
        Op::Le => apply_cmp(lhs, rhs, std::cmp::Ordering::is_le),
        Op::Gt => apply_cmp(lhs, rhs, std::cmp::Ordering::is_gt),
        Op::Ge => apply_cmp(lhs, rhs, std::cmp::Ordering::is_ge),
        Op::Negate => unreachable!("unary op handled separately"),
    }
}

fn apply_add(lhs: Value, rhs: Value) -> Result<Value, DbError> {
    if let (Value::Str(a), Value::Str(b)) = (&lhs, &rhs) {
        return Ok(Value::Str(format!("{a}{b}")));
    }
    apply_numeric(lhs, rhs, |a, b| a + b, |a, b| a + b)
}

fn apply_numeric(
    lhs: Value,
    rhs: Value,
    int_op: impl Fn(i64, i64) -> i64,
    double_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, DbError> {
    match Value::promote_numeric_pair(&lhs, &rhs)? {
        (PromotedNumeric::Int(a), PromotedNumeric::Int(b)) => Ok(Value::Int(int_op(a, b))),
        (PromotedNumeric::Double(a), PromotedNumeric::Double(b)) => Ok(Value::Double(double_op(a, b))),
        _ => unreachable!("promote_numeric_pair always returns a matching pair"),
    }
}

fn apply_div(lhs: Value, rhs: Value) -> Result<Value, DbError> {
    match Value::promote_numeric_pair(&lhs, &rhs)? {
        (PromotedNumeric::Int(a), PromotedNumeric::Int(b)) => {
            if b == 0 {
                Err(DbError::DivByZero)
            } else {
                Ok(Value::Int(a / b))
            }
        }
        (PromotedNumeric::Double(a), PromotedNumeric::Double(b)) => {
            if b == 0.0 {
                Err(DbError::DivByZero)
            } else {
                Ok(Value::Double(a / b))
            }
        }
        _ => unreachable!(),
    }
}

fn apply_mod(lhs: Value, rhs: Value) -> Result<Value, DbError> {
    let a = lhs.as_int()?;
    let b = rhs.as_int()?;
    if b == 0 {
        Err(DbError::DivByZero)
    } else {
        Ok(Value::Int(a % b))
    }
}

fn apply_bool(lhs: Value, rhs: Value, op: impl Fn(bool, bool) -> bool) -> Result<Value, DbError> {
    Ok(Value::Bool(op(lhs.as_bool()?, rhs.as_bool()?)))
}

fn apply_eq(lhs: Value, rhs: Value) -> Result<bool, DbError> {
    if matches!(
        (&lhs, &rhs),
        (Value::Int(_) | Value::Double(_), Value::Int(_) | Value::Double(_))
    ) {
        let (a, b) = Value::promote_numeric_pair(&lhs, &rhs)?;
        return Ok(a == b);
    }
    if lhs.kind() != rhs.kind() {
        return Err(DbError::TypeMismatch(format!(
            "cannot compare {} with {}",
            lhs.kind(),
            rhs.kind()
        )));
    }
    Ok(lhs == rhs)
}

fn apply_cmp(lhs: Value, rhs: Value, test: impl Fn(std::cmp::Ordering) -> bool) -> Result<Value, DbError> {
    let ordering = match (&lhs, &rhs) {
        (Value::Int(_) | Value::Double(_), Value::Int(_) | Value::Double(_)) => {
            let (a, b) = Value::promote_numeric_pair(&lhs, &rhs)?;
            match (a, b) {
                (PromotedNumeric::Int(a), PromotedNumeric::Int(b)) => a.cmp(&b),
                (PromotedNumeric::Double(a), PromotedNumeric::Double(b)) => a
                    .partial_cmp(&b)
                    .ok_or_else(|| DbError::TypeMismatch("cannot compare NaN".to_string()))?,
                _ => unreachable!(),
            }
        }
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => {
            return Err(DbError::TypeMismatch(format!(
                "relational operators require numeric or string operands, found {} and {}",
                lhs.kind(),
                rhs.kind()
            )))
        }
    };
    Ok(Value::Bool(test(ordering)))
}

fn malformed(expr: &str) -> DbError {
    parse_err(expr, "malformed expression")
}

fn parse_err(expr: &str, message: impl Into<String>) -> DbError {
    DbError::ParseExpression {
        expression: expr.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, Value)]) -> Env {
        pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn respects_operator_precedence() {
        let result = evaluate("2 + 3 * 4", &Env::new()).unwrap();
        assert_eq!(result, Value::Int(14));
    }

    #[test]
    fn parens_override_precedence() {
        let result = evaluate("(2 + 3) * 4", &Env::new()).unwrap();
        assert_eq!(result, Value::Int(20));
    }

    #[test]
    fn unary_minus_binds_tightest() {
        let result = evaluate("-2 * 3", &Env::new()).unwrap();
        assert_eq!(result, Value::Int(-6));
    }

    #[test]
    fn resolves_identifiers_from_env() {
        let e = env(&[("x", Value::Int(10))]);
        let result = evaluate("x + 5", &e).unwrap();
        assert_eq!(result, Value::Int(15));
    }

    #[test]
    fn unknown_identifier_errors() {
        assert!(evaluate("missing + 1", &Env::new()).is_err());
    }

    #[test]
    fn mixed_int_double_promotes() {
        let result = evaluate("1 + 2.5", &Env::new()).unwrap();
        assert_eq!(result, Value::Double(3.5));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(evaluate("1 / 0", &Env::new()), Err(DbError::DivByZero));
    }

    #[test]
    fn modulo_requires_ints() {
        assert!(evaluate("1.5 % 2", &Env::new()).is_err());
    }

    #[test]
    fn string_concatenation() {
        let result = evaluate(r#""foo" + "bar""#, &Env::new()).unwrap();
        assert_eq!(result, Value::Str("foobar".to_string()));
    }

    #[test]
    fn boolean_short_circuit_is_not_required_but_both_branches_evaluate_correctly() {
        let e = env(&[("flag", Value::Bool(true))]);
        let result = evaluate("flag || false", &e).unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[test]
    fn relational_chain_with_predicate_helper() {
        let e = env(&[("age", Value::Int(21))]);
        assert!(evaluate_predicate("age >= 18 && age < 65", &e).unwrap());
    }

    #[test]
    fn predicate_must_be_boolean() {
        assert!(evaluate_predicate("1 + 1", &Env::new()).is_err());
    }

    #[test]
    fn relational_operators_reject_bool_operands() {
        let e = env(&[("flag", Value::Bool(true))]);
        assert!(evaluate("flag < true", &e).is_err());
    }

    #[test]
    fn string_ordering_is_lexicographic() {
        assert!(evaluate_predicate(r#""abc" < "abd""#, &Env::new()).unwrap());
    }

    #[test]
    fn xor_is_true_only_when_operands_differ() {
        assert_eq!(evaluate("true ^^ false", &Env::new()).unwrap(), Value::Bool(true));
        assert_eq!(evaluate("true ^^ true", &Env::new()).unwrap(), Value::Bool(false));
    }
}

//! Expression and predicate evaluation.
//!
//! Every `DEFAULT`, `VALUES` entry, `SET` right-hand side, and
//! `WHERE`/`ON` predicate is raw text captured by the parser. This
//! module tokenizes that text, runs the shunting-yard algorithm to get
//! a postfix form, and reduces it against an identifier environment
//! built fresh for each row.

mod evaluator;
mod token;
mod tokenizer;

pub use evaluator::{evaluate, evaluate_predicate, Env};
pub use token::{ExprToken, Op};

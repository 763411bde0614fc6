//! The tagged value domain every row, literal, and expression result is made of.

use std::fmt;

use crate::error::DbError;

/// A single cell value.
///
/// Lifetime follows the row that holds it. Equality and ordering
/// within a case follow natural semantics; cross-case comparison of
/// the two numeric cases promotes `Int` to `Double` (see
/// [`Value::promote_numeric_pair`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A signed 64-bit integer.
    Int(i64),
    /// A double-precision float.
    Double(f64),
    /// A boolean.
    Bool(bool),
    /// A UTF-8 string.
    Str(String),
    /// An opaque byte buffer.
    Bytes(Vec<u8>),
}

/// The five declared column types, mirroring [`Value`]'s cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `INT`
    Int,
    /// `DOUBLE`
    Double,
    /// `BOOL`
    Bool,
    /// `VARCHAR`
    Varchar,
    /// `BYTEBUFFER`
    Bytes,
}

impl ValueKind {
    /// Returns the SQL type keyword for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Double => "DOUBLE",
            Self::Bool => "BOOL",
            Self::Varchar => "VARCHAR",
            Self::Bytes => "BYTEBUFFER",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the declared-type case of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Double(_) => ValueKind::Double,
            Self::Bool(_) => ValueKind::Bool,
            Self::Str(_) => ValueKind::Varchar,
            Self::Bytes(_) => ValueKind::Bytes,
        }
    }

    /// Returns the typed zero for a column declared with the given kind.
    ///
    /// Used when a positional insert leaves a slot empty and the
    /// column has neither a default nor auto-increment.
    #[must_use]
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Int => Self::Int(0),
            ValueKind::Double => Self::Double(0.0),
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Varchar => Self::Str(String::new()),
            ValueKind::Bytes => Self::Bytes(Vec::new()),
        }
    }

    /// Extracts the integer case, promoting nothing (ints never promote *from*).
    pub fn as_int(&self) -> Result<i64, DbError> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(DbError::TypeMismatch(format!(
                "expected INT, found {}",
                other.kind()
            ))),
        }
    }

    /// Extracts the boolean case.
    pub fn as_bool(&self) -> Result<bool, DbError> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(DbError::TypeMismatch(format!(
                "expected BOOL, found {}",
                other.kind()
            ))),
        }
    }

    /// Extracts the string case.
    pub fn as_str_value(&self) -> Result<&str, DbError> {
        match self {
            Self::Str(v) => Ok(v.as_str()),
            other => Err(DbError::TypeMismatch(format!(
                "expected VARCHAR, found {}",
                other.kind()
            ))),
        }
    }

    /// Extracts a double, promoting an `Int` operand.
    pub fn as_double(&self) -> Result<f64, DbError> {
        match self {
            Self::Double(v) => Ok(*v),
            Self::Int(v) => Ok(*v as f64),
            other => Err(DbError::TypeMismatch(format!(
                "expected a numeric value, found {}",
                other.kind()
            ))),
        }
    }

    /// Returns `true` if this value's case matches `kind` exactly
    /// (no promotion — used for column type checks on insert).
    #[must_use]
    pub fn matches_kind(&self, kind: ValueKind) -> bool {
        self.kind() == kind
    }

    /// Promotes a pair of values for numeric comparison/arithmetic:
    /// if either side is `Double`, both are converted to `Double`; if
    /// both are `Int`, neither is touched. Any other pairing is a
    /// [`DbError::TypeMismatch`].
    pub fn promote_numeric_pair(a: &Self, b: &Self) -> Result<(PromotedNumeric, PromotedNumeric), DbError> {
        match (a, b) {
            (Self::Int(x), Self::Int(y)) => Ok((PromotedNumeric::Int(*x), PromotedNumeric::Int(*y))),
            (Self::Int(_) | Self::Double(_), Self::Int(_) | Self::Double(_)) => {
                Ok((PromotedNumeric::Double(a.as_double()?), PromotedNumeric::Double(b.as_double()?)))
            }
            _ => Err(DbError::TypeMismatch(format!(
                "cannot compare {} with {}",
                a.kind(),
                b.kind()
            ))),
        }
    }
}

/// The result of [`Value::promote_numeric_pair`]: either both operands
/// stayed integers, or both were widened to doubles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromotedNumeric {
    /// Both operands were integers.
    Int(i64),
    /// At least one operand was a double; both are now doubles.
    Double(f64),
}

impl fmt::Display for Value {
    /// The canonical, lossless stringification used to build index
    /// keys and to populate the evaluator's identifier environment.
    ///
    /// `Int`: decimal. `Double`: Rust's default float formatting
    /// (always contains a fractional part). `Bool`: `"0"`/`"1"`.
    /// `Str`: as-is. `Bytes`: `0x` followed by lowercase hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => {
                if v.fract() == 0.0 && v.is_finite() {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Self::Bool(v) => write!(f, "{}", u8::from(*v)),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bytes(v) => {
                write!(f, "0x")?;
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringifies_each_case() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Double(3.5).to_string(), "3.5");
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        assert_eq!(Value::Bool(true).to_string(), "1");
        assert_eq!(Value::Bool(false).to_string(), "0");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
        assert_eq!(Value::Bytes(vec![0xAB, 0x0F]).to_string(), "0xab0f");
    }

    #[test]
    fn promotes_int_and_double() {
        let (a, b) = Value::promote_numeric_pair(&Value::Int(3), &Value::Double(1.5)).unwrap();
        assert_eq!(a, PromotedNumeric::Double(3.0));
        assert_eq!(b, PromotedNumeric::Double(1.5));

        let (a, b) = Value::promote_numeric_pair(&Value::Int(3), &Value::Int(4)).unwrap();
        assert_eq!(a, PromotedNumeric::Int(3));
        assert_eq!(b, PromotedNumeric::Int(4));
    }

    #[test]
    fn rejects_cross_case_promotion() {
        assert!(Value::promote_numeric_pair(&Value::Str("x".into()), &Value::Int(1)).is_err());
    }

    #[test]
    fn zero_matches_kind() {
        assert_eq!(Value::zero(ValueKind::Int), Value::Int(0));
        assert_eq!(Value::zero(ValueKind::Varchar), Value::Str(String::new()));
    }
}

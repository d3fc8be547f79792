use std::cmp::Ordering;
use std::fmt;

use regex::Regex;

use super::error::EvalError;
use super::expr::CompareOp;

/// Dynamically-typed result of evaluating an expression.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of strings, written `[a,b,c]`.
    List(Vec<String>),
    /// A compiled regular expression, the right operand of `~` and `!~`.
    Pattern(Regex),
}

impl Value {
    /// Short name of this value's type, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Pattern(_) => "pattern",
        }
    }

    /// The boolean inside this value.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Type`] for any other type.
    pub fn as_bool(&self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::type_mismatch("boolean", other)),
        }
    }

    /// The integer inside this value.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Type`] for any other type.
    pub fn as_int(&self) -> Result<i64, EvalError> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(EvalError::type_mismatch("integer", other)),
        }
    }

    /// The string inside this value.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Type`] for any other type.
    pub fn as_str(&self) -> Result<&str, EvalError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(EvalError::type_mismatch("string", other)),
        }
    }

    /// Compare this value (the left operand) to `other` using `op`.
    ///
    /// Integers and strings are ordered; booleans and lists only support
    /// equality. `in` tests whether this value is an element of the list
    /// `other` (integers are looked up numerically), or whether this string
    /// contains the string `other`. `~` matches this string against a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Unsupported`] when `op` is not defined for the
    /// operand types.
    pub fn compare(&self, op: CompareOp, other: &Value) -> Result<bool, EvalError> {
        let result = match op {
            CompareOp::In | CompareOp::NotIn => self
                .contained_in(other)
                .map(|found| found == (op == CompareOp::In)),
            CompareOp::Match | CompareOp::NotMatch => match (self, other) {
                (Value::String(s), Value::Pattern(re)) => {
                    Some(re.is_match(s) == (op == CompareOp::Match))
                }
                _ => None,
            },
            CompareOp::Eq | CompareOp::Neq => self
                .order(other)
                .map(|ord| (ord == Ordering::Equal) == (op == CompareOp::Eq)),
            CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte => self
                .order(other)
                .filter(|_| self.is_ordered())
                .map(|ord| match op {
                    CompareOp::Gt => ord == Ordering::Greater,
                    CompareOp::Gte => ord != Ordering::Less,
                    CompareOp::Lt => ord == Ordering::Less,
                    _ => ord != Ordering::Greater,
                }),
        };
        result.ok_or_else(|| EvalError::unsupported(op, self, other))
    }

    fn order(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn is_ordered(&self) -> bool {
        matches!(self, Value::Int(_) | Value::String(_))
    }

    fn contained_in(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::String(needle), Value::List(items)) => Some(items.contains(needle)),
            (Value::Int(needle), Value::List(items)) => Some(
                items
                    .iter()
                    .any(|item| crate::parse::parse_integer(item) == Ok(*needle)),
            ),
            (Value::String(haystack), Value::String(needle)) => {
                Some(haystack.contains(needle.as_str()))
            }
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl From<Regex> for Value {
    fn from(v: Regex) -> Self {
        Value::Pattern(v)
    }
}

/// Renders the literal form that decodes back to the same value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{}\"", crate::parse::escape(v)),
            Value::Pattern(re) => write!(f, "\"{}\"", crate::parse::escape(re.as_str())),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"{}\"", crate::parse::escape(item))?;
                }
                write!(f, "]")
            }
        }
    }
}

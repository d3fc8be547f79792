use std::num::ParseIntError;

use thiserror::Error;

use super::value::Value;

/// Errors raised while evaluating an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("type error: expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    #[error("type error: '{op}' is not defined for {left} and {right}")]
    Unsupported {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("cannot read '{text}' as an integer: {source}")]
    InvalidInteger { text: String, source: ParseIntError },

    #[error("integer overflow in '{op}'")]
    Overflow { op: &'static str },

    /// Failure reported by a host-supplied operator or accessor.
    #[error("{0}")]
    Host(String),
}

impl EvalError {
    pub(crate) fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        EvalError::Type {
            expected,
            found: found.type_name(),
        }
    }

    pub(crate) fn unsupported(op: impl ToString, left: &Value, right: &Value) -> Self {
        EvalError::Unsupported {
            op: op.to_string(),
            left: left.type_name(),
            right: right.type_name(),
        }
    }

    /// Convenience constructor for host operators and accessors.
    pub fn host(message: impl Into<String>) -> Self {
        EvalError::Host(message.into())
    }
}

/// A variable factory could not bind a reference to an accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResolveError {
    message: String,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors detected while assembling a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("symbols must not be empty")]
    EmptySymbol,

    #[error("symbol '{symbol}' is registered twice")]
    DuplicateSymbol { symbol: String },

    #[error("symbol '{symbol}' starts with a reserved character")]
    ReservedSymbol { symbol: String },
}

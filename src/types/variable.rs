use std::fmt;

use super::error::{EvalError, ResolveError};
use super::value::Value;

/// The declared type of a variable reference, chosen by its prefix
/// (`{num: x}`) or by the grammar's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Number,
}

impl ValueType {
    /// The [`Value::type_name`] a variable of this type produces.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "integer",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => f.write_str("string"),
            ValueType::Number => f.write_str("number"),
        }
    }
}

/// Reads one variable's value from a context.
pub trait Accessor<C>: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`EvalError`] when the value cannot be produced.
    fn get(&self, ctx: &C) -> Result<Value, EvalError>;
}

impl<C, F> Accessor<C> for F
where
    F: Fn(&C) -> Result<Value, EvalError> + Send + Sync,
{
    fn get(&self, ctx: &C) -> Result<Value, EvalError> {
        self(ctx)
    }
}

/// Binds variable names to accessors while an expression is parsed.
pub trait VarFactory<C>: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when `name` cannot be bound; parsing then
    /// fails at the variable reference.
    fn resolve(&self, name: &str, ty: ValueType) -> Result<Box<dyn Accessor<C>>, ResolveError>;
}

impl<C, F> VarFactory<C> for F
where
    F: Fn(&str, ValueType) -> Result<Box<dyn Accessor<C>>, ResolveError> + Send + Sync,
{
    fn resolve(&self, name: &str, ty: ValueType) -> Result<Box<dyn Accessor<C>>, ResolveError> {
        self(name, ty)
    }
}

/// Factory for grammars that have no variables. Every reference fails to
/// resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVariables;

impl<C> VarFactory<C> for NoVariables {
    fn resolve(&self, name: &str, _ty: ValueType) -> Result<Box<dyn Accessor<C>>, ResolveError> {
        Err(ResolveError::new(format!(
            "variables are not supported here (found '{name}')"
        )))
    }
}

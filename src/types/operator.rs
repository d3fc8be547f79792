use std::fmt;
use std::sync::Arc;

use super::error::EvalError;
use super::expr::Expr;
use super::value::Value;

/// A host-defined binary operator.
///
/// `left` is the running result of the group so far. `right` is the child
/// expression the operator introduced, left unevaluated so the operator can
/// decide whether to evaluate it at all.
pub trait Operator<C>: Send + Sync {
    /// Combine `left` with `right`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] when the operands are unsuitable or when
    /// evaluating `right` fails.
    fn apply(&self, left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError>;
}

impl<C, F> Operator<C> for F
where
    F: Fn(Value, &Expr<C>, &C) -> Result<Value, EvalError> + Send + Sync,
{
    fn apply(&self, left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
        self(left, right, ctx)
    }
}

/// A registered operator together with the symbol it was registered under.
pub struct OperatorRef<C> {
    symbol: Arc<str>,
    op: Arc<dyn Operator<C>>,
}

impl<C> OperatorRef<C> {
    pub(crate) fn new(symbol: Arc<str>, op: Arc<dyn Operator<C>>) -> Self {
        Self { symbol, op }
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Apply the operator.
    ///
    /// # Errors
    ///
    /// Propagates the operator's own error.
    pub fn apply(&self, left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
        self.op.apply(left, right, ctx)
    }
}

impl<C> Clone for OperatorRef<C> {
    fn clone(&self) -> Self {
        Self {
            symbol: Arc::clone(&self.symbol),
            op: Arc::clone(&self.op),
        }
    }
}

impl<C> fmt::Debug for OperatorRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OperatorRef").field(&self.symbol).finish()
    }
}

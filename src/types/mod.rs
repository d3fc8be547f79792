mod context;
mod error;
mod expr;
pub(crate) mod grammar;
mod operator;
mod value;
mod variable;

pub use context::{Context, ContextVars};
pub use error::{EvalError, GrammarError, ResolveError};
pub use expr::{CompareOp, Comparison, Expr, Group, Logic, VarRef};
pub use grammar::{GrammarBuilder, DEFAULT_MAX_DEPTH};
pub use operator::{Operator, OperatorRef};
pub use value::Value;
pub use variable::{Accessor, NoVariables, ValueType, VarFactory};

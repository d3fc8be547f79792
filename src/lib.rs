//! Filter and expression parsing with host-defined grammars.
//!
//! A grammar is a set of symbols registered on a [`GrammarBuilder`]: binary
//! operators that fold a group left to right, `&&`/`||` style logic, and
//! comparisons against variable references written `{name}` or
//! `{prefix: name}`. Building the grammar yields an immutable [`Parser`]; each
//! parse produces an [`Expr`] tree that can be evaluated against any number
//! of contexts, from any number of threads.
//!
//! ```
//! use filtrex::{Context, parse_filter};
//!
//! let expr = parse_filter(r#"{num: retries} < 3 && {region} in [eu,us]"#).unwrap();
//! let ctx = Context::new().set("retries", 1_i64).set("region", "eu");
//! assert!(expr.matches(&ctx).unwrap());
//! ```
//!
//! Operators have no precedence. Mixing `&&` and `||`, or logic and other
//! operators, inside one parenthesised group is a parse error.

mod compile;
mod error;
mod evaluate;
pub mod lex;
pub mod ops;
mod parse;
mod types;

pub use error::FiltrexError;
pub use lex::LexError;
pub use parse::{
    escape, parse_integer, unescape, LiteralError, ParseError, ParseErrorKind, Parser, SyntaxError,
};
pub use types::{
    Accessor, CompareOp, Comparison, Context, ContextVars, EvalError, Expr, GrammarBuilder,
    GrammarError, Group, Logic, NoVariables, Operator, OperatorRef, ResolveError, Value, ValueType,
    VarFactory, VarRef, DEFAULT_MAX_DEPTH,
};

/// Parse `input` with the [filter grammar](GrammarBuilder::filter), binding
/// variables to paths in a [`Context`].
///
/// # Errors
///
/// Returns [`FiltrexError::Parse`] if the input is not a valid filter.
pub fn parse_filter(input: &str) -> Result<Expr<Context>, FiltrexError> {
    let parser = GrammarBuilder::filter().build(ContextVars)?;
    Ok(parser.parse(input)?)
}

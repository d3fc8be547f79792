use thiserror::Error;

use crate::parse::ParseError;
use crate::{EvalError, GrammarError};

/// Unified error type covering grammar construction, parsing, evaluation,
/// and I/O.
///
/// Returned by convenience functions like [`parse_filter`](crate::parse_filter) and
/// [`Parser::parse_file`](crate::Parser::parse_file).
#[derive(Debug, Error)]
pub enum FiltrexError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

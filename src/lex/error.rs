use thiserror::Error;

/// Errors raised while splitting input into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// Operator-like text that starts a registered symbol but never completes one.
    /// Only reported when the scanner runs in strict mode.
    #[error("unknown symbol '{text}'")]
    UnknownSymbol { text: String, offset: usize },

    #[error("unterminated string literal")]
    UnterminatedString { offset: usize },

    #[error("unterminated list literal")]
    UnterminatedList { offset: usize },
}

impl LexError {
    /// Byte offset at which the offending text starts.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnknownSymbol { offset, .. }
            | LexError::UnterminatedString { offset }
            | LexError::UnterminatedList { offset } => *offset,
        }
    }
}

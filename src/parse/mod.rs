mod automaton;
mod error;
mod literal;

use std::fmt;
use std::path::Path;

pub use error::{LiteralError, ParseError, ParseErrorKind, SyntaxError};
pub use literal::{escape, parse_integer, unescape};

use crate::types::grammar::Grammar;
use crate::types::{Expr, ValueType, VarFactory};
use crate::FiltrexError;

/// An immutable parser for one grammar. Built by
/// [`GrammarBuilder::build`](crate::GrammarBuilder::build).
///
/// Parsing only reads the grammar, so a `Parser` can be shared across
/// threads behind an `Arc` and used concurrently.
pub struct Parser<C> {
    grammar: Grammar<C>,
    factory: Box<dyn VarFactory<C>>,
}

impl<C> Parser<C> {
    pub(crate) fn new(grammar: Grammar<C>, factory: Box<dyn VarFactory<C>>) -> Self {
        Self { grammar, factory }
    }

    /// Parse `input` into an expression tree. Variable references are bound
    /// through the factory as they are encountered.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] with the byte offset, line, and column of the
    /// first problem found.
    pub fn parse(&self, input: &str) -> Result<Expr<C>, ParseError> {
        automaton::parse(&self.grammar, self.factory.as_ref(), input)
    }

    /// Parse raw bytes, which must be UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ParseErrorKind::InvalidUtf8`] at the first invalid byte, or
    /// any error [`parse`](Self::parse) reports.
    pub fn parse_bytes(&self, input: &[u8]) -> Result<Expr<C>, ParseError> {
        match std::str::from_utf8(input) {
            Ok(text) => self.parse(text),
            Err(err) => {
                let valid = &input[..err.valid_up_to()];
                let prefix = std::str::from_utf8(valid).unwrap_or_default();
                Err(ParseError::new(
                    ParseErrorKind::InvalidUtf8,
                    prefix,
                    err.valid_up_to(),
                ))
            }
        }
    }

    /// Read and parse an expression stored in a file.
    ///
    /// # Errors
    ///
    /// Returns [`FiltrexError::Io`] if the file cannot be read, or
    /// [`FiltrexError::Parse`] if its contents do not parse.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Expr<C>, FiltrexError> {
        let bytes = std::fs::read(path)?;
        Ok(self.parse_bytes(&bytes)?)
    }

    /// Type given to variable references without a prefix.
    #[must_use]
    pub fn default_value_type(&self) -> ValueType {
        self.grammar.default_type
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.grammar.max_depth
    }
}

impl<C> fmt::Debug for Parser<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("grammar", &self.grammar)
            .finish_non_exhaustive()
    }
}

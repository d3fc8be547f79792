mod error;
mod scanner;
mod symbol_table;

use std::fmt;
use std::ops::Range;

pub use error::LexError;
pub use scanner::Scanner;
pub use symbol_table::{Lookup, SymbolTable};

/// Byte offsets into the scanned input.
pub type Span = Range<usize>;

/// Identifier of a recognised symbol.
///
/// The first few identifiers are reserved for the delimiters every grammar
/// shares; operators and value-type prefixes are numbered from
/// [`TokenId::FIRST_DYNAMIC`] upward in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u32);

impl TokenId {
    /// End of input. Never stored in a [`SymbolTable`].
    pub const EOI: TokenId = TokenId(0);
    pub const LEFT_PAREN: TokenId = TokenId(1);
    pub const RIGHT_PAREN: TokenId = TokenId(2);
    pub const VAR_START: TokenId = TokenId(3);
    pub const VAR_END: TokenId = TokenId(4);
    /// First identifier handed out to host-registered symbols.
    pub const FIRST_DYNAMIC: TokenId = TokenId(16);
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TokenId::EOI => write!(f, "end of input"),
            TokenId::LEFT_PAREN => write!(f, "'('"),
            TokenId::RIGHT_PAREN => write!(f, "')'"),
            TokenId::VAR_START => write!(f, "'{{'"),
            TokenId::VAR_END => write!(f, "'}}'"),
            TokenId(id) => write!(f, "token #{id}"),
        }
    }
}

/// A recognised symbol occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(id: TokenId, span: Span) -> Self {
        Self { id, span }
    }
}

pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\r' | b'\t' | 0x0c | 0x08)
}

pub(crate) fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

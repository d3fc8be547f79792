use tracing::trace;

use super::{is_whitespace, is_word, LexError, Lookup, SymbolTable, Token, TokenId};

/// Splits input into tokens using greedy longest-match lookup in a
/// [`SymbolTable`].
///
/// Text between two tokens is not tokenised. The parser pulls it on demand
/// with [`take_literal`](Self::take_literal) or drops it with
/// [`skip_literal`](Self::skip_literal); each pending span is consumed once.
///
/// Double-quoted strings and bracketed lists are opaque: symbols inside them
/// are not recognised.
#[derive(Debug)]
pub struct Scanner<'a> {
    input: &'a str,
    symbols: &'a SymbolTable,
    pos: usize,
    literal_start: usize,
    token: Token,
    strict: bool,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(input: &'a str, symbols: &'a SymbolTable) -> Self {
        Self {
            input,
            symbols,
            pos: 0,
            literal_start: 0,
            token: Token::new(TokenId::EOI, 0..0),
            strict: false,
        }
    }

    /// In strict mode, operator-like text that begins a registered symbol but
    /// never completes one is a [`LexError::UnknownSymbol`] instead of literal text.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The most recently emitted token.
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Advance to the next token. Once the input is exhausted every call
    /// returns an end-of-input token.
    ///
    /// # Errors
    ///
    /// Returns [`LexError`] for unterminated string or list literals, and for
    /// unknown operator text in strict mode.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let bytes = self.input.as_bytes();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(&first) = bytes.get(start) else {
                self.token = Token::new(TokenId::EOI, bytes.len()..bytes.len());
                return Ok(self.token.clone());
            };
            match first {
                b'"' => self.pos = self.skip_string(start)?,
                b'[' => self.pos = self.skip_list(start)?,
                _ => match self.longest_match(start)? {
                    Some((id, end)) => {
                        self.pos = end;
                        self.token = Token::new(id, start..end);
                        trace!(token = %id, start, end, "scanned token");
                        return Ok(self.token.clone());
                    }
                    None => self.pos = start + 1,
                },
            }
        }
    }

    /// Take the text between the previous token and the current one, trimmed
    /// of surrounding whitespace.
    pub fn take_literal(&mut self) -> &'a str {
        let end = self.token.span.start.max(self.literal_start);
        let text = self.input.get(self.literal_start..end).unwrap_or_default();
        self.literal_start = self.token.span.end;
        text.trim_matches(|c: char| c.is_ascii() && is_whitespace(c as u8))
    }

    /// Discard the pending literal text without reading it.
    pub fn skip_literal(&mut self) {
        self.literal_start = self.token.span.end;
    }

    /// Offset of the first non-whitespace byte of the pending literal text,
    /// or of the current token when there is none.
    #[must_use]
    pub fn literal_offset(&self) -> usize {
        let end = self.token.span.start.max(self.literal_start);
        self.input.as_bytes()[self.literal_start..end]
            .iter()
            .position(|&b| !is_whitespace(b))
            .map_or(self.token.span.start, |skip| self.literal_start + skip)
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while bytes.get(self.pos).is_some_and(|&b| is_whitespace(b)) {
            self.pos += 1;
        }
    }

    /// Greedy longest match starting at `start`, honouring word boundaries.
    fn longest_match(&self, start: usize) -> Result<Option<(TokenId, usize)>, LexError> {
        let bytes = self.input.as_bytes();
        if is_word(bytes[start]) && start > 0 && is_word(bytes[start - 1]) {
            return Ok(None);
        }

        let mut best = None;
        let mut viable_end = start;
        let mut end = start;
        while end < bytes.len() {
            end += 1;
            match self.symbols.lookup(&bytes[start..end]) {
                Lookup::Prefix => viable_end = end,
                Lookup::Exact { token, extendable } => {
                    if self.ends_on_boundary(end) {
                        best = Some((token, end));
                    }
                    viable_end = end;
                    if !extendable {
                        break;
                    }
                }
                Lookup::NoMatch => break,
            }
        }

        if best.is_none() && self.strict && viable_end > start {
            let candidate = &bytes[start..viable_end];
            if candidate.iter().all(|&b| !is_word(b)) {
                return Err(LexError::UnknownSymbol {
                    text: String::from_utf8_lossy(candidate).into_owned(),
                    offset: start,
                });
            }
        }
        Ok(best)
    }

    fn ends_on_boundary(&self, end: usize) -> bool {
        let bytes = self.input.as_bytes();
        !is_word(bytes[end - 1]) || bytes.get(end).map_or(true, |&b| !is_word(b))
    }

    /// Returns the offset just past the closing quote of the string at `start`.
    fn skip_string(&self, start: usize) -> Result<usize, LexError> {
        let bytes = self.input.as_bytes();
        let mut i = start + 1;
        while let Some(&b) = bytes.get(i) {
            match b {
                b'\\' => i += 2,
                b'"' => return Ok(i + 1),
                _ => i += 1,
            }
        }
        Err(LexError::UnterminatedString { offset: start })
    }

    /// Returns the offset just past the closing bracket of the list at `start`.
    fn skip_list(&self, start: usize) -> Result<usize, LexError> {
        let bytes = self.input.as_bytes();
        let mut i = start + 1;
        while let Some(&b) = bytes.get(i) {
            match b {
                b'\\' => i += 2,
                b'"' => i = self.skip_string(i)?,
                b']' => return Ok(i + 1),
                _ => i += 1,
            }
        }
        Err(LexError::UnterminatedList { offset: start })
    }
}

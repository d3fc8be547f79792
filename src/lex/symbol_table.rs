use std::collections::HashMap;

use super::TokenId;

/// Outcome of looking up a candidate byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The bytes are a registered symbol. `extendable` is true when a longer
    /// registered symbol also starts with them.
    Exact { token: TokenId, extendable: bool },
    /// Not a symbol yet, but more bytes could complete one.
    Prefix,
    /// No registered symbol starts with these bytes.
    NoMatch,
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: HashMap<u8, Node>,
    token: Option<TokenId>,
}

/// Byte trie mapping registered symbols to token identifiers.
///
/// Results depend only on the registered byte content, never on the order in
/// which symbols were inserted.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    root: Node,
    symbols: HashMap<TokenId, Vec<u8>>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `symbol` under `token`.
    ///
    /// # Errors
    ///
    /// Returns the token already bound to `symbol` if it was registered before.
    /// The existing binding is left untouched.
    pub fn insert(&mut self, symbol: &[u8], token: TokenId) -> Result<(), TokenId> {
        debug_assert!(!symbol.is_empty(), "symbols must not be empty");
        let mut node = &mut self.root;
        for &b in symbol {
            node = node.children.entry(b).or_default();
        }
        if let Some(existing) = node.token {
            return Err(existing);
        }
        node.token = Some(token);
        self.symbols.insert(token, symbol.to_vec());
        Ok(())
    }

    /// Classify `bytes` against the registered symbols.
    #[must_use]
    pub fn lookup(&self, bytes: &[u8]) -> Lookup {
        let mut node = &self.root;
        for b in bytes {
            match node.children.get(b) {
                Some(next) => node = next,
                None => return Lookup::NoMatch,
            }
        }
        match node.token {
            Some(token) => Lookup::Exact {
                token,
                extendable: !node.children.is_empty(),
            },
            None if node.children.is_empty() => Lookup::NoMatch,
            None => Lookup::Prefix,
        }
    }

    /// The registered text of `token`, if any.
    #[must_use]
    pub fn symbol(&self, token: TokenId) -> Option<&[u8]> {
        self.symbols.get(&token).map(Vec::as_slice)
    }

    /// Number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

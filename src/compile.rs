use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::lex::{SymbolTable, TokenId};
use crate::types::grammar::{Combinator, Grammar, GrammarBuilder, Symbol, SymbolDef, SymbolKind};
use crate::types::{GrammarError, OperatorRef, ValueType};

/// Characters a registered symbol may not start with. Quotes and brackets
/// open opaque literals; parentheses and braces are structural.
const RESERVED_STARTS: &[char] = &['"', '[', ']', '(', ')', '{', '}'];

const STRUCTURAL: [(&str, TokenId); 4] = [
    ("(", TokenId::LEFT_PAREN),
    (")", TokenId::RIGHT_PAREN),
    ("{", TokenId::VAR_START),
    ("}", TokenId::VAR_END),
];

pub(crate) fn compile<C>(builder: GrammarBuilder<C>) -> Result<Grammar<C>, GrammarError> {
    let GrammarBuilder {
        defs,
        default_type,
        max_depth,
        strict,
    } = builder;

    check_symbols(&defs)?;

    let mut table = SymbolTable::new();
    let mut symbols = HashMap::new();
    for (text, id) in STRUCTURAL {
        table
            .insert(text.as_bytes(), id)
            .map_err(|_| GrammarError::DuplicateSymbol {
                symbol: text.to_owned(),
            })?;
        symbols.insert(id, structural(id));
    }

    let default_type = default_type
        .or_else(|| first_value_type(&defs))
        .unwrap_or(ValueType::String);

    let mut next = TokenId::FIRST_DYNAMIC.0;
    for SymbolDef { text, kind } in defs {
        let id = TokenId(next);
        next += 1;
        if table.insert(text.as_bytes(), id).is_err() {
            return Err(GrammarError::DuplicateSymbol { symbol: text });
        }
        let symbol = match kind {
            SymbolKind::Operator(op) => {
                Symbol::Combinator(Combinator::Fold(OperatorRef::new(Arc::from(text.as_str()), op)))
            }
            SymbolKind::Logic(logic) => Symbol::Combinator(Combinator::Logic(logic)),
            SymbolKind::Compare(op) => Symbol::Compare(op),
            SymbolKind::ValueType(ty) => Symbol::ValueType {
                ty,
                prefix: Arc::from(text.as_str()),
            },
        };
        symbols.insert(id, symbol);
    }

    debug!(
        symbols = table.len(),
        %default_type,
        max_depth,
        strict,
        "grammar built"
    );

    Ok(Grammar {
        table,
        symbols,
        default_type,
        max_depth,
        strict,
    })
}

fn check_symbols<C>(defs: &[SymbolDef<C>]) -> Result<(), GrammarError> {
    for def in defs {
        if def.text.is_empty() {
            return Err(GrammarError::EmptySymbol);
        }
        if def.text.starts_with(RESERVED_STARTS) || def.text.starts_with(char::is_whitespace) {
            return Err(GrammarError::ReservedSymbol {
                symbol: def.text.clone(),
            });
        }
    }
    Ok(())
}

fn first_value_type<C>(defs: &[SymbolDef<C>]) -> Option<ValueType> {
    defs.iter().find_map(|def| match def.kind {
        SymbolKind::ValueType(ty) => Some(ty),
        _ => None,
    })
}

fn structural<C>(id: TokenId) -> Symbol<C> {
    match id {
        TokenId::LEFT_PAREN => Symbol::LeftParen,
        TokenId::RIGHT_PAREN => Symbol::RightParen,
        TokenId::VAR_START => Symbol::VarStart,
        _ => Symbol::VarEnd,
    }
}

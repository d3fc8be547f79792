use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::{EvalError, GrammarError};
use super::expr::{CompareOp, Expr, Logic};
use super::operator::{Operator, OperatorRef};
use super::value::Value;
use super::variable::{ValueType, VarFactory};
use crate::lex::{SymbolTable, TokenId};
use crate::ops;
use crate::parse::Parser;

/// Nesting limit applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Builder for a grammar: the symbols an expression language recognises and
/// what each of them means.
///
/// Registration order never changes how input is tokenised. Once
/// [`build`](Self::build) succeeds the grammar is frozen inside the returned
/// [`Parser`].
///
/// # Example
///
/// ```
/// use filtrex::{Context, ContextVars, GrammarBuilder};
///
/// let parser = GrammarBuilder::filter().build(ContextVars).unwrap();
/// let expr = parser.parse("{num: age} >= 18 && {status} == active").unwrap();
///
/// let ctx = Context::new().set("age", 30_i64).set("status", "active");
/// assert!(expr.matches(&ctx).unwrap());
/// ```
pub struct GrammarBuilder<C> {
    pub(crate) defs: Vec<SymbolDef<C>>,
    pub(crate) default_type: Option<ValueType>,
    pub(crate) max_depth: usize,
    pub(crate) strict: bool,
}

pub(crate) struct SymbolDef<C> {
    pub(crate) text: String,
    pub(crate) kind: SymbolKind<C>,
}

pub(crate) enum SymbolKind<C> {
    Operator(Arc<dyn Operator<C>>),
    Logic(Logic),
    Compare(CompareOp),
    ValueType(ValueType),
}

impl<C> GrammarBuilder<C> {
    /// A grammar with only the structural symbols `( ) { }`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            defs: Vec::new(),
            default_type: None,
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
        }
    }

    /// The filter grammar: `&&` `||`, the ten comparison operators, and the
    /// `num:` / `str:` type prefixes. Untyped variables are strings.
    #[must_use]
    pub fn filter() -> Self {
        let mut builder = Self::new()
            .logic("&&", Logic::And)
            .logic("||", Logic::Or);
        for (op, symbol) in CompareOp::ALL {
            builder = builder.comparator(symbol, op);
        }
        builder
            .value_type("num:", ValueType::Number)
            .value_type("str:", ValueType::String)
            .default_value_type(ValueType::String)
    }

    /// Register a short-circuit logic combinator.
    #[must_use]
    pub fn logic(self, symbol: &str, logic: Logic) -> Self {
        self.define(symbol, SymbolKind::Logic(logic))
    }

    /// Register a comparison operator. Comparisons must directly follow a
    /// variable reference.
    #[must_use]
    pub fn comparator(self, symbol: &str, op: CompareOp) -> Self {
        self.define(symbol, SymbolKind::Compare(op))
    }

    /// Register a type prefix for variable references, e.g. `num:` in
    /// `{num: x}`.
    #[must_use]
    pub fn value_type(self, prefix: &str, ty: ValueType) -> Self {
        self.define(prefix, SymbolKind::ValueType(ty))
    }

    /// Type of variables written without a prefix. Defaults to the first
    /// registered prefix's type, or [`ValueType::String`].
    #[must_use]
    pub fn default_value_type(mut self, ty: ValueType) -> Self {
        self.default_type = Some(ty);
        self
    }

    /// Maximum nesting of groups and variable references, counting the
    /// implicit outermost group.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Reject operator-like text that matches no registered symbol instead
    /// of treating it as literal text.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Register a binary operator implemented by a trait object.
    #[must_use]
    pub fn operator_impl(self, symbol: &str, op: impl Operator<C> + 'static) -> Self {
        self.define(symbol, SymbolKind::Operator(Arc::new(op)))
    }

    /// Register a binary operator. Operators in one group fold left to right.
    #[must_use]
    pub fn operator<F>(self, symbol: &str, f: F) -> Self
    where
        F: Fn(Value, &Expr<C>, &C) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.operator_impl(symbol, f)
    }

    /// Freeze the grammar and pair it with the factory that binds variable
    /// references.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError`] for empty, duplicate, or reserved symbols.
    pub fn build(self, factory: impl VarFactory<C> + 'static) -> Result<Parser<C>, GrammarError> {
        let grammar = crate::compile::compile(self)?;
        Ok(Parser::new(grammar, Box::new(factory)))
    }

    fn define(mut self, text: &str, kind: SymbolKind<C>) -> Self {
        self.defs.push(SymbolDef {
            text: text.to_owned(),
            kind,
        });
        self
    }
}

impl<C: 'static> GrammarBuilder<C> {
    /// A general-purpose arithmetic grammar built from [`ops`]:
    /// `+ - *`, the six comparisons, `&&` `||` as operators, and `in`.
    /// Untyped variables are numbers.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .operator("+", ops::add)
            .operator("-", ops::sub)
            .operator("*", ops::mul)
            .operator("==", ops::eq)
            .operator("!=", ops::ne)
            .operator("<", ops::lt)
            .operator("<=", ops::le)
            .operator(">", ops::gt)
            .operator(">=", ops::ge)
            .operator("&&", ops::and)
            .operator("||", ops::or)
            .operator("in", ops::contains)
            .value_type("num:", ValueType::Number)
            .value_type("str:", ValueType::String)
            .default_value_type(ValueType::Number)
    }
}

impl<C> Default for GrammarBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for GrammarBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.defs.iter().map(|d| d.text.as_str()).collect();
        f.debug_struct("GrammarBuilder")
            .field("symbols", &symbols)
            .field("default_type", &self.default_type)
            .field("max_depth", &self.max_depth)
            .field("strict", &self.strict)
            .finish()
    }
}

/// A frozen grammar: the symbol table plus the meaning of every token.
pub(crate) struct Grammar<C> {
    pub(crate) table: SymbolTable,
    pub(crate) symbols: HashMap<TokenId, Symbol<C>>,
    pub(crate) default_type: ValueType,
    pub(crate) max_depth: usize,
    pub(crate) strict: bool,
}

pub(crate) enum Symbol<C> {
    LeftParen,
    RightParen,
    VarStart,
    VarEnd,
    Combinator(Combinator<C>),
    Compare(CompareOp),
    ValueType { ty: ValueType, prefix: Arc<str> },
}

/// What joins two children of a group.
pub(crate) enum Combinator<C> {
    Fold(OperatorRef<C>),
    Logic(Logic),
}

impl<C> Clone for Combinator<C> {
    fn clone(&self) -> Self {
        match self {
            Combinator::Fold(op) => Combinator::Fold(op.clone()),
            Combinator::Logic(logic) => Combinator::Logic(*logic),
        }
    }
}

impl<C> Grammar<C> {
    pub(crate) fn symbol(&self, id: TokenId) -> Option<&Symbol<C>> {
        self.symbols.get(&id)
    }

    /// Human-readable name of a token for error messages.
    pub(crate) fn describe(&self, id: TokenId) -> String {
        if id == TokenId::EOI {
            return "end of input".to_owned();
        }
        match self.table.symbol(id) {
            Some(text) => format!("'{}'", String::from_utf8_lossy(text)),
            None => format!("token {id}"),
        }
    }
}

impl<C> fmt::Debug for Grammar<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("symbols", &self.table.len())
            .field("default_type", &self.default_type)
            .field("max_depth", &self.max_depth)
            .field("strict", &self.strict)
            .finish()
    }
}

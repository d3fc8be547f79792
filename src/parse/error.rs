use std::num::ParseIntError;

use thiserror::Error;

use crate::lex::LexError;
use crate::types::{CompareOp, Logic, ResolveError};

/// Errors produced when parsing an expression, located in the input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    kind: ParseErrorKind,
    offset: usize,
    line: usize,
    column: usize,
}

impl ParseError {
    /// Locate `kind` at byte `offset` of `input`. Lines and columns are
    /// 1-based; columns count characters.
    pub(crate) fn new(kind: ParseErrorKind, input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let before = input.get(..offset).unwrap_or(input);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            kind,
            offset,
            line,
            column,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Byte offset into the input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// The syntax error, when that is what went wrong.
    #[must_use]
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match &self.kind {
            ParseErrorKind::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("cannot resolve variable '{name}': {source}")]
    Resolution { name: String, source: ResolveError },

    #[error("invalid literal '{text}': {source}")]
    Literal { text: String, source: LiteralError },

    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

/// Token sequences the grammar does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected {found} after {after}")]
    UnexpectedToken { found: String, after: String },

    #[error("unexpected text '{text}' before {found}")]
    UnexpectedText { text: String, found: String },

    #[error("missing operand before {found}")]
    MissingOperand { found: String },

    #[error("expected an operator")]
    MissingOperator,

    #[error("comparison '{op}' must follow a variable reference")]
    ComparatorWithoutVariable { op: CompareOp },

    #[error("empty variable reference")]
    EmptyVariable,

    #[error("variable reference is not closed")]
    UnclosedVariable,

    #[error("cannot mix '&&' and '||' in one group; add parentheses")]
    MixedLogic,

    #[error("cannot mix '{logic}' with other operators in one group; add parentheses")]
    MixedCombinators { logic: Logic },

    #[error("unmatched '{delimiter}'")]
    UnmatchedOpen { delimiter: char },

    #[error("unmatched ')'")]
    UnmatchedClose,

    #[error("empty expression")]
    EmptyExpression,

    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Literal text that could not be decoded into a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiteralError {
    #[error(transparent)]
    Integer(#[from] ParseIntError),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error("{0}")]
    Malformed(String),
}

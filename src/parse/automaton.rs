//! The stack automaton that turns a token stream into an expression tree.
//!
//! Every transition looks at exactly one previous token. The pending literal
//! text between two tokens is resolved by the second one: as an operand, a
//! comparison's right-hand side, a variable name, or not at all (in which
//! case it must be empty).

use std::sync::Arc;

use tracing::{debug, trace};

use super::error::{ParseError, ParseErrorKind, SyntaxError};
use super::literal;
use crate::lex::{Scanner, TokenId};
use crate::types::grammar::{Combinator, Grammar, Symbol};
use crate::types::{
    CompareOp, Comparison, Expr, Group, Logic, Value, ValueType, VarFactory, VarRef,
};

type Fail = (ParseErrorKind, usize);

fn syntax(err: SyntaxError, at: usize) -> Fail {
    (ParseErrorKind::Syntax(err), at)
}

pub(crate) fn parse<C>(
    grammar: &Grammar<C>,
    factory: &dyn VarFactory<C>,
    input: &str,
) -> Result<Expr<C>, ParseError> {
    let automaton = Automaton {
        grammar,
        factory,
        scanner: Scanner::new(input, &grammar.table).strict(grammar.strict),
        stack: vec![Frame::Group {
            link: None,
            group: GroupBuilder::new(),
            opened_at: 0,
        }],
        prev: Prev::Start,
        prev_token: None,
    };
    automaton.run().map_err(|(kind, offset)| {
        let err = ParseError::new(kind, input, offset);
        debug!(error = %err, "parse failed");
        err
    })
}

/// The previous token, as far as the next transition cares.
enum Prev<C> {
    Start,
    Open,
    Close,
    VarStart,
    VarEnd,
    TypePrefix,
    Combinator(Combinator<C>),
    Compare(CompareOp),
}

enum Frame<C> {
    Group {
        link: Option<Combinator<C>>,
        group: GroupBuilder<C>,
        opened_at: usize,
    },
    Var {
        link: Option<Combinator<C>>,
        prefix: Option<(ValueType, Arc<str>)>,
        opened_at: usize,
    },
}

/// Children collected so far for one open group. A group is either a fold
/// over registered operators or a single kind of logic, never both.
struct GroupBuilder<C> {
    children: Vec<(Option<Combinator<C>>, Expr<C>)>,
    logic: Option<Logic>,
    folds: bool,
}

impl<C> GroupBuilder<C> {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            logic: None,
            folds: false,
        }
    }

    fn admit(&mut self, link: &Combinator<C>) -> Result<(), SyntaxError> {
        match link {
            Combinator::Logic(logic) => {
                if self.folds {
                    return Err(SyntaxError::MixedCombinators { logic: *logic });
                }
                match self.logic {
                    Some(existing) if existing != *logic => return Err(SyntaxError::MixedLogic),
                    _ => self.logic = Some(*logic),
                }
            }
            Combinator::Fold(_) => {
                if let Some(logic) = self.logic {
                    return Err(SyntaxError::MixedCombinators { logic });
                }
                self.folds = true;
            }
        }
        Ok(())
    }

    fn push(&mut self, link: Option<Combinator<C>>, expr: Expr<C>) {
        self.children.push((link, expr));
    }

    /// Remove the last child if it is a bare variable reference.
    fn take_var(&mut self) -> Option<(Option<Combinator<C>>, VarRef<C>)> {
        match self.children.pop()? {
            (link, Expr::Var(var)) => Some((link, var)),
            other => {
                self.children.push(other);
                None
            }
        }
    }

    fn finish(self) -> Result<Group<C>, SyntaxError> {
        let mut children = self.children.into_iter();
        let Some((_, first)) = children.next() else {
            return Err(SyntaxError::EmptyExpression);
        };
        if let Some(logic) = self.logic {
            let mut all = vec![first];
            all.extend(children.map(|(_, expr)| expr));
            return Ok(Group::Logic {
                logic,
                children: all,
            });
        }
        let rest = children
            .map(|(link, expr)| match link {
                Some(Combinator::Fold(op)) => Ok((op, expr)),
                _ => Err(SyntaxError::MissingOperator),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Group::Fold {
            first: Box::new(first),
            rest,
        })
    }
}

struct Automaton<'a, C> {
    grammar: &'a Grammar<C>,
    factory: &'a dyn VarFactory<C>,
    scanner: Scanner<'a>,
    stack: Vec<Frame<C>>,
    prev: Prev<C>,
    prev_token: Option<TokenId>,
}

impl<C> Automaton<'_, C> {
    fn run(mut self) -> Result<Expr<C>, Fail> {
        let grammar = self.grammar;
        loop {
            let token = self.scanner.next_token().map_err(|err| {
                let offset = err.offset();
                (ParseErrorKind::Lex(err), offset)
            })?;
            let at = token.span.start;
            if token.id == TokenId::EOI {
                return self.finish(at);
            }
            let Some(symbol) = grammar.symbol(token.id) else {
                return Err(self.unexpected(at));
            };
            self.prev = match symbol {
                Symbol::LeftParen => {
                    self.open(at, false)?;
                    Prev::Open
                }
                Symbol::VarStart => {
                    self.open(at, true)?;
                    Prev::VarStart
                }
                Symbol::RightParen => {
                    self.close_group(at)?;
                    Prev::Close
                }
                Symbol::VarEnd => {
                    self.close_var(at)?;
                    Prev::VarEnd
                }
                Symbol::Combinator(link) => {
                    self.combinator(link, at)?;
                    Prev::Combinator(link.clone())
                }
                Symbol::Compare(op) => {
                    self.comparator(*op, at)?;
                    Prev::Compare(*op)
                }
                Symbol::ValueType { ty, prefix } => {
                    self.type_prefix(*ty, prefix, at)?;
                    Prev::TypePrefix
                }
            };
            self.prev_token = Some(token.id);
        }
    }

    fn open(&mut self, at: usize, var: bool) -> Result<(), Fail> {
        let link = match &self.prev {
            Prev::Start | Prev::Open => None,
            Prev::Combinator(link) => Some(link.clone()),
            _ => return Err(self.unexpected(at)),
        };
        self.no_literal(at)?;
        if self.stack.len() >= self.grammar.max_depth {
            return Err(syntax(
                SyntaxError::NestingTooDeep {
                    limit: self.grammar.max_depth,
                },
                at,
            ));
        }
        self.stack.push(if var {
            Frame::Var {
                link,
                prefix: None,
                opened_at: at,
            }
        } else {
            Frame::Group {
                link,
                group: GroupBuilder::new(),
                opened_at: at,
            }
        });
        trace!(depth = self.stack.len(), at, "frame opened");
        Ok(())
    }

    fn close_group(&mut self, at: usize) -> Result<(), Fail> {
        if self.stack.len() <= 1 {
            return Err(syntax(SyntaxError::UnmatchedClose, at));
        }
        self.resolve_pending(at)?;
        let Some(Frame::Group { link, group, .. }) = self.stack.pop() else {
            return Err(syntax(SyntaxError::UnclosedVariable, at));
        };
        let group = group.finish().map_err(|err| syntax(err, at))?;
        self.group(at)?.push(link, Expr::Group(group));
        trace!(depth = self.stack.len(), at, "frame closed");
        Ok(())
    }

    fn close_var(&mut self, at: usize) -> Result<(), Fail> {
        if !matches!(self.prev, Prev::VarStart | Prev::TypePrefix) {
            return Err(self.unexpected(at));
        }
        let offset = self.scanner.literal_offset();
        let name = self.scanner.take_literal();
        if name.is_empty() {
            return Err(syntax(SyntaxError::EmptyVariable, at));
        }
        let Some(Frame::Var { link, prefix, .. }) = self.stack.pop() else {
            return Err(syntax(SyntaxError::UnclosedVariable, at));
        };
        let (ty, prefix) = match prefix {
            Some((ty, text)) => (ty, Some(text.to_string())),
            None => (self.grammar.default_type, None),
        };
        let accessor = self.factory.resolve(name, ty).map_err(|source| {
            let kind = ParseErrorKind::Resolution {
                name: name.to_owned(),
                source,
            };
            (kind, offset)
        })?;
        self.group(at)?
            .push(link, Expr::Var(VarRef::new(name, ty, prefix, accessor)));
        Ok(())
    }

    fn combinator(&mut self, link: &Combinator<C>, at: usize) -> Result<(), Fail> {
        if matches!(self.prev, Prev::Start | Prev::Open) {
            let value = self.operand(at)?;
            self.group(at)?.push(None, Expr::Literal(value));
        } else {
            self.resolve_pending(at)?;
        }
        self.group(at)?.admit(link).map_err(|err| syntax(err, at))
    }

    fn comparator(&mut self, op: CompareOp, at: usize) -> Result<(), Fail> {
        if !matches!(self.prev, Prev::VarEnd) {
            return Err(syntax(SyntaxError::ComparatorWithoutVariable { op }, at));
        }
        self.no_literal(at)
    }

    fn type_prefix(&mut self, ty: ValueType, prefix: &Arc<str>, at: usize) -> Result<(), Fail> {
        if !matches!(self.prev, Prev::VarStart) {
            return Err(self.unexpected(at));
        }
        self.no_literal(at)?;
        if let Some(Frame::Var { prefix: slot, .. }) = self.stack.last_mut() {
            *slot = Some((ty, Arc::clone(prefix)));
        }
        Ok(())
    }

    fn finish(mut self, at: usize) -> Result<Expr<C>, Fail> {
        match self.prev {
            Prev::Start => {
                let err = if self.scanner.take_literal().is_empty() {
                    SyntaxError::EmptyExpression
                } else {
                    SyntaxError::MissingOperator
                };
                return Err(syntax(err, at));
            }
            // Reported as an unmatched delimiter below.
            Prev::Open | Prev::VarStart | Prev::TypePrefix => {}
            _ => self.resolve_pending(at)?,
        }
        if self.stack.len() > 1 {
            let (delimiter, opened_at) = match self.stack.last() {
                Some(Frame::Var { opened_at, .. }) => ('{', *opened_at),
                Some(Frame::Group { opened_at, .. }) => ('(', *opened_at),
                None => ('(', at),
            };
            return Err(syntax(SyntaxError::UnmatchedOpen { delimiter }, opened_at));
        }
        match self.stack.pop() {
            Some(Frame::Group { group, .. }) => {
                let group = group.finish().map_err(|err| syntax(err, at))?;
                // A fully parenthesised input is its own root.
                Ok(match group {
                    Group::Fold { first, rest }
                        if rest.is_empty() && matches!(*first, Expr::Group(_)) =>
                    {
                        *first
                    }
                    group => Expr::Group(group),
                })
            }
            _ => Err(syntax(SyntaxError::EmptyExpression, at)),
        }
    }

    /// Settle the literal text that ends at the current closing token
    /// (`)`, a combinator, or end of input).
    fn resolve_pending(&mut self, at: usize) -> Result<(), Fail> {
        match &self.prev {
            Prev::Close | Prev::VarEnd => self.no_literal(at),
            Prev::Combinator(link) => {
                let link = link.clone();
                let value = self.operand(at)?;
                self.group(at)?.push(Some(link), Expr::Literal(value));
                Ok(())
            }
            Prev::Compare(op) => {
                let op = *op;
                self.complete_comparison(op, at)
            }
            Prev::Start | Prev::Open | Prev::VarStart | Prev::TypePrefix => {
                Err(self.unexpected(at))
            }
        }
    }

    fn complete_comparison(&mut self, op: CompareOp, at: usize) -> Result<(), Fail> {
        let offset = self.scanner.literal_offset();
        let text = self.scanner.take_literal();
        if text.is_empty() {
            return Err(self.missing_operand(at));
        }
        let group = self.group(at)?;
        let Some((link, var)) = group.take_var() else {
            return Err(syntax(SyntaxError::ComparatorWithoutVariable { op }, at));
        };
        let operand = literal::decode_operand(text, op, var.value_type()).map_err(|source| {
            let kind = ParseErrorKind::Literal {
                text: text.to_owned(),
                source,
            };
            (kind, offset)
        })?;
        group.push(link, Expr::Compare(Comparison::new(var, op, operand)));
        Ok(())
    }

    fn operand(&mut self, at: usize) -> Result<Value, Fail> {
        let offset = self.scanner.literal_offset();
        let text = self.scanner.take_literal();
        if text.is_empty() {
            return Err(self.missing_operand(at));
        }
        literal::decode(text).map_err(|source| {
            let kind = ParseErrorKind::Literal {
                text: text.to_owned(),
                source,
            };
            (kind, offset)
        })
    }

    fn no_literal(&mut self, at: usize) -> Result<(), Fail> {
        let offset = self.scanner.literal_offset();
        let text = self.scanner.take_literal();
        if text.is_empty() {
            return Ok(());
        }
        let err = SyntaxError::UnexpectedText {
            text: text.to_owned(),
            found: self.current(),
        };
        Err(syntax(err, offset))
    }

    fn group(&mut self, at: usize) -> Result<&mut GroupBuilder<C>, Fail> {
        match self.stack.last_mut() {
            Some(Frame::Group { group, .. }) => Ok(group),
            _ => Err(syntax(SyntaxError::UnclosedVariable, at)),
        }
    }

    fn current(&self) -> String {
        self.grammar.describe(self.scanner.token().id)
    }

    fn unexpected(&self, at: usize) -> Fail {
        let after = match self.prev_token {
            Some(id) => self.grammar.describe(id),
            None => "start of input".to_owned(),
        };
        let err = SyntaxError::UnexpectedToken {
            found: self.current(),
            after,
        };
        syntax(err, at)
    }

    fn missing_operand(&self, at: usize) -> Fail {
        syntax(
            SyntaxError::MissingOperand {
                found: self.current(),
            },
            at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EvalError, GrammarBuilder, NoVariables, ResolveError};

    fn standard() -> crate::Parser<()> {
        GrammarBuilder::standard().build(NoVariables).unwrap()
    }

    fn syntax_err(result: Result<Expr<()>, ParseError>) -> (SyntaxError, usize) {
        let err = result.unwrap_err();
        (err.syntax().cloned().unwrap(), err.offset())
    }

    #[test]
    fn folds_left_to_right() {
        let expr = standard().parse("1 + 2 * 3").unwrap();
        // No precedence: (1 + 2) * 3.
        assert_eq!(expr.exec(&()), Ok(Value::Int(9)));
        assert_eq!(expr.to_string(), "(1 + 2 * 3)");
    }

    #[test]
    fn nested_groups() {
        let expr = standard().parse("((4+(1+2)+3)+5)==15").unwrap();
        assert_eq!(expr.exec(&()), Ok(Value::Bool(true)));
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(syntax_err(standard().parse("")), (SyntaxError::EmptyExpression, 0));
        assert_eq!(syntax_err(standard().parse("   ")), (SyntaxError::EmptyExpression, 3));
        assert_eq!(syntax_err(standard().parse("abc")), (SyntaxError::MissingOperator, 3));
    }

    #[test]
    fn empty_parens_are_unexpected() {
        let (err, at) = syntax_err(standard().parse("1 + ()"));
        assert_eq!(
            err,
            SyntaxError::UnexpectedToken {
                found: "')'".into(),
                after: "'('".into()
            }
        );
        assert_eq!(at, 5);
    }

    #[test]
    fn missing_operands() {
        assert_eq!(
            syntax_err(standard().parse("1 +")),
            (
                SyntaxError::MissingOperand {
                    found: "end of input".into()
                },
                3
            )
        );
        assert_eq!(
            syntax_err(standard().parse("+ 1")),
            (SyntaxError::MissingOperand { found: "'+'".into() }, 0)
        );
    }

    #[test]
    fn text_between_group_and_operator() {
        assert_eq!(
            syntax_err(standard().parse("(1 + 2) x + 3")),
            (
                SyntaxError::UnexpectedText {
                    text: "x".into(),
                    found: "'+'".into()
                },
                8
            )
        );
    }

    #[test]
    fn unmatched_delimiters() {
        assert_eq!(
            syntax_err(standard().parse("(1 + 2")),
            (SyntaxError::UnmatchedOpen { delimiter: '(' }, 0)
        );
        assert_eq!(
            syntax_err(standard().parse("1 + 2)")),
            (SyntaxError::UnmatchedClose, 5)
        );
    }

    #[test]
    fn depth_limit() {
        let parser = GrammarBuilder::standard()
            .max_depth(3)
            .build(NoVariables)
            .unwrap();
        assert!(parser.parse("((1 + 1))").is_ok());
        assert_eq!(
            syntax_err(parser.parse("(((1 + 1)))")),
            (SyntaxError::NestingTooDeep { limit: 3 }, 2)
        );
    }

    #[test]
    fn resolution_failure_points_at_name() {
        let parser = GrammarBuilder::<()>::standard().build(NoVariables).unwrap();
        let err = parser.parse("1 + {  x }").unwrap_err();
        assert!(matches!(err.kind(), ParseErrorKind::Resolution { name, .. } if name == "x"));
        assert_eq!(err.offset(), 7);
    }

    #[test]
    fn variables_bind_with_declared_type() {
        let factory = |name: &str, ty: ValueType| -> Result<Box<dyn crate::Accessor<i64>>, ResolveError> {
            match (name, ty) {
                ("n", ValueType::Number) => Ok(Box::new(|ctx: &i64| -> Result<Value, EvalError> {
                    Ok(Value::Int(*ctx))
                })),
                _ => Err(ResolveError::new("unknown")),
            }
        };
        let parser = GrammarBuilder::<i64>::standard().build(factory).unwrap();
        let expr = parser.parse("{n} * {num: n}").unwrap();
        assert_eq!(expr.exec(&6), Ok(Value::Int(36)));
        assert!(parser.parse("{str: n}").is_err());
    }
}

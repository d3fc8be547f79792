use std::fmt;

use super::error::EvalError;
use super::operator::OperatorRef;
use super::value::Value;
use super::variable::{Accessor, ValueType};

/// Comparison operators of the filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Match,
    NotMatch,
}

impl CompareOp {
    /// Every operator, paired with its canonical symbol.
    pub const ALL: [(CompareOp, &'static str); 10] = [
        (CompareOp::Eq, "=="),
        (CompareOp::Neq, "!="),
        (CompareOp::Gt, ">"),
        (CompareOp::Gte, ">="),
        (CompareOp::Lt, "<"),
        (CompareOp::Lte, "<="),
        (CompareOp::In, "in"),
        (CompareOp::NotIn, "!in"),
        (CompareOp::Match, "~"),
        (CompareOp::NotMatch, "!~"),
    ];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::In => "in",
            CompareOp::NotIn => "!in",
            CompareOp::Match => "~",
            CompareOp::NotMatch => "!~",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Short-circuit logic used by filter groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    And,
    Or,
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => f.write_str("&&"),
            Logic::Or => f.write_str("||"),
        }
    }
}

/// A parsed expression tree.
///
/// Trees are immutable and own their children. Evaluation never touches the
/// tree itself, so one tree can be evaluated from many threads at once, each
/// with its own context.
pub enum Expr<C> {
    Group(Group<C>),
    Var(VarRef<C>),
    Literal(Value),
    Compare(Comparison<C>),
}

/// A parenthesised sequence of child expressions and the way they combine.
pub enum Group<C> {
    /// Left fold: `first`, then each registered operator applied to the
    /// running result and the child it introduced.
    Fold {
        first: Box<Expr<C>>,
        rest: Vec<(OperatorRef<C>, Expr<C>)>,
    },
    /// Short-circuit `&&` or `||` over boolean children.
    Logic { logic: Logic, children: Vec<Expr<C>> },
}

/// A variable reference bound to its accessor at parse time.
pub struct VarRef<C> {
    name: String,
    ty: ValueType,
    prefix: Option<String>,
    accessor: Box<dyn Accessor<C>>,
}

/// `{var} <op> literal` in the filter grammar.
pub struct Comparison<C> {
    var: VarRef<C>,
    op: CompareOp,
    operand: Value,
}

impl<C> Expr<C> {
    /// Evaluate against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvalError`] raised anywhere in the tree.
    pub fn exec(&self, ctx: &C) -> Result<Value, EvalError> {
        crate::evaluate::eval(self, ctx)
    }

    /// Evaluate against `ctx` and require a boolean result.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Type`] when the result is not a boolean, or any
    /// error raised during evaluation.
    pub fn matches(&self, ctx: &C) -> Result<bool, EvalError> {
        self.exec(ctx)?.as_bool()
    }
}

impl<C> VarRef<C> {
    pub(crate) fn new(
        name: &str,
        ty: ValueType,
        prefix: Option<String>,
        accessor: Box<dyn Accessor<C>>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            ty,
            prefix,
            accessor,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    /// Read this variable from `ctx`.
    ///
    /// # Errors
    ///
    /// Propagates whatever the accessor reports.
    pub fn exec(&self, ctx: &C) -> Result<Value, EvalError> {
        self.accessor.get(ctx)
    }
}

impl<C> Comparison<C> {
    pub(crate) fn new(var: VarRef<C>, op: CompareOp, operand: Value) -> Self {
        Self { var, op, operand }
    }

    #[must_use]
    pub fn var(&self) -> &VarRef<C> {
        &self.var
    }

    #[must_use]
    pub fn op(&self) -> CompareOp {
        self.op
    }

    #[must_use]
    pub fn operand(&self) -> &Value {
        &self.operand
    }
}

impl<C> fmt::Display for Expr<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Group(group) => write!(f, "{group}"),
            Expr::Var(var) => write!(f, "{var}"),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Compare(cmp) => write!(f, "{} {} {}", cmp.var, cmp.op, cmp.operand),
        }
    }
}

impl<C> fmt::Display for Group<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Fold { first, rest } => {
                write!(f, "({first}")?;
                for (op, child) in rest {
                    write!(f, " {} {child}", op.symbol())?;
                }
                write!(f, ")")
            }
            Group::Logic { logic, children } => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {logic} ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl<C> fmt::Display for VarRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{{{prefix} {}}}", self.name),
            None => write!(f, "{{{}}}", self.name),
        }
    }
}

impl<C> fmt::Debug for Expr<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Group(group) => f.debug_tuple("Group").field(group).finish(),
            Expr::Var(var) => f.debug_tuple("Var").field(var).finish(),
            Expr::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Expr::Compare(cmp) => f.debug_tuple("Compare").field(cmp).finish(),
        }
    }
}

impl<C> fmt::Debug for Group<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Fold { first, rest } => f
                .debug_struct("Fold")
                .field("first", first)
                .field("rest", rest)
                .finish(),
            Group::Logic { logic, children } => f
                .debug_struct("Logic")
                .field("logic", logic)
                .field("children", children)
                .finish(),
        }
    }
}

impl<C> fmt::Debug for VarRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarRef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Debug for Comparison<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparison")
            .field("var", &self.var)
            .field("op", &self.op)
            .field("operand", &self.operand)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, ty: ValueType, prefix: Option<&str>) -> VarRef<()> {
        let accessor = |_: &()| -> Result<Value, EvalError> { Ok(Value::Int(7)) };
        VarRef::new(name, ty, prefix.map(str::to_owned), Box::new(accessor))
    }

    #[test]
    fn compare_op_symbols_round_trip() {
        for (op, symbol) in CompareOp::ALL {
            assert_eq!(op.symbol(), symbol);
            assert_eq!(op.to_string(), symbol);
        }
    }

    #[test]
    fn logic_display() {
        assert_eq!(Logic::And.to_string(), "&&");
        assert_eq!(Logic::Or.to_string(), "||");
    }

    #[test]
    fn var_display_keeps_prefix() {
        assert_eq!(var("a.b", ValueType::Number, Some("num:")).to_string(), "{num: a.b}");
        assert_eq!(var("a", ValueType::String, None).to_string(), "{a}");
    }

    #[test]
    fn comparison_display() {
        let cmp = Comparison::new(
            var("key1", ValueType::Number, Some("num:")),
            CompareOp::Gte,
            Value::Int(3),
        );
        assert_eq!(Expr::Compare(cmp).to_string(), "{num: key1} >= 3");
    }

    #[test]
    fn logic_group_display() {
        let group: Group<()> = Group::Logic {
            logic: Logic::Or,
            children: vec![Expr::Literal(Value::Bool(false)), Expr::Literal(Value::Bool(true))],
        };
        assert_eq!(group.to_string(), "(false || true)");
    }

    #[test]
    fn var_exec_uses_accessor() {
        let v = var("x", ValueType::Number, None);
        assert_eq!(v.exec(&()), Ok(Value::Int(7)));
        assert_eq!(v.name(), "x");
        assert_eq!(v.value_type(), ValueType::Number);
    }

    #[test]
    fn debug_omits_accessor() {
        let v = var("x", ValueType::String, None);
        let rendered = format!("{:?}", Expr::Var(v));
        assert!(rendered.contains("\"x\""), "{rendered}");
        assert!(rendered.contains(".."), "{rendered}");
    }
}

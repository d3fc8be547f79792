use crate::{EvalError, Expr, Group, Logic, Value};

pub(crate) fn eval<C>(expr: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    match expr {
        Expr::Group(group) => eval_group(group, ctx),
        Expr::Var(var) => var.exec(ctx),
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Compare(cmp) => cmp
            .var()
            .exec(ctx)?
            .compare(cmp.op(), cmp.operand())
            .map(Value::Bool),
    }
}

fn eval_group<C>(group: &Group<C>, ctx: &C) -> Result<Value, EvalError> {
    match group {
        Group::Fold { first, rest } => rest
            .iter()
            .try_fold(eval(first, ctx)?, |acc, (op, child)| op.apply(acc, child, ctx)),
        Group::Logic { logic, children } => {
            // An empty conjunction holds; an empty disjunction does not.
            let mut result = *logic == Logic::And;
            for child in children {
                result = eval(child, ctx)?.as_bool()?;
                match logic {
                    Logic::And if !result => break,
                    Logic::Or if result => break,
                    _ => {}
                }
            }
            Ok(Value::Bool(result))
        }
    }
}

//! Ready-made operator functions for generic grammars.
//!
//! Each function has the shape [`GrammarBuilder::operator`] expects, so a
//! grammar can bind any symbol to them:
//!
//! ```
//! use filtrex::{GrammarBuilder, NoVariables, Value, ops};
//!
//! let parser = GrammarBuilder::<()>::new()
//!     .operator("plus", ops::add)
//!     .build(NoVariables)
//!     .unwrap();
//! let expr = parser.parse("40 plus 2").unwrap();
//! assert_eq!(expr.exec(&()).unwrap(), Value::Int(42));
//! ```
//!
//! [`GrammarBuilder::operator`]: crate::GrammarBuilder::operator

use crate::{CompareOp, EvalError, Expr, Value};

/// Checked integer addition.
///
/// # Errors
///
/// [`EvalError::Type`] for non-integers, [`EvalError::Overflow`] on overflow.
pub fn add<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    let (a, b) = integers(&left, right, ctx)?;
    a.checked_add(b).map(Value::Int).ok_or(EvalError::Overflow { op: "+" })
}

/// Checked integer subtraction.
///
/// # Errors
///
/// [`EvalError::Type`] for non-integers, [`EvalError::Overflow`] on overflow.
pub fn sub<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    let (a, b) = integers(&left, right, ctx)?;
    a.checked_sub(b).map(Value::Int).ok_or(EvalError::Overflow { op: "-" })
}

/// Checked integer multiplication.
///
/// # Errors
///
/// [`EvalError::Type`] for non-integers, [`EvalError::Overflow`] on overflow.
pub fn mul<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    let (a, b) = integers(&left, right, ctx)?;
    a.checked_mul(b).map(Value::Int).ok_or(EvalError::Overflow { op: "*" })
}

/// Equality between two values of the same type.
///
/// # Errors
///
/// [`EvalError::Unsupported`] when the types differ.
pub fn eq<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    compare(CompareOp::Eq, &left, right, ctx)
}

/// # Errors
///
/// [`EvalError::Unsupported`] when the types differ.
pub fn ne<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    compare(CompareOp::Neq, &left, right, ctx)
}

/// # Errors
///
/// [`EvalError::Unsupported`] unless both sides are integers or both strings.
pub fn lt<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    compare(CompareOp::Lt, &left, right, ctx)
}

/// # Errors
///
/// [`EvalError::Unsupported`] unless both sides are integers or both strings.
pub fn le<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    compare(CompareOp::Lte, &left, right, ctx)
}

/// # Errors
///
/// [`EvalError::Unsupported`] unless both sides are integers or both strings.
pub fn gt<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    compare(CompareOp::Gt, &left, right, ctx)
}

/// # Errors
///
/// [`EvalError::Unsupported`] unless both sides are integers or both strings.
pub fn ge<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    compare(CompareOp::Gte, &left, right, ctx)
}

/// Boolean AND. `right` is not evaluated when `left` is false.
///
/// # Errors
///
/// [`EvalError::Type`] when either evaluated side is not a boolean.
pub fn and<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    if !left.as_bool()? {
        return Ok(Value::Bool(false));
    }
    right.exec(ctx)?.as_bool().map(Value::Bool)
}

/// Boolean OR. `right` is not evaluated when `left` is true.
///
/// # Errors
///
/// [`EvalError::Type`] when either evaluated side is not a boolean.
pub fn or<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    if left.as_bool()? {
        return Ok(Value::Bool(true));
    }
    right.exec(ctx)?.as_bool().map(Value::Bool)
}

/// Membership: `left` is an element of the list `right`, or the string
/// `left` contains the string `right`.
///
/// # Errors
///
/// [`EvalError::Unsupported`] for any other pair of types.
pub fn contains<C>(left: Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    compare(CompareOp::In, &left, right, ctx)
}

fn integers<C>(left: &Value, right: &Expr<C>, ctx: &C) -> Result<(i64, i64), EvalError> {
    let a = left.as_int()?;
    let b = right.exec(ctx)?.as_int()?;
    Ok((a, b))
}

fn compare<C>(op: CompareOp, left: &Value, right: &Expr<C>, ctx: &C) -> Result<Value, EvalError> {
    let right = right.exec(ctx)?;
    left.compare(op, &right).map(Value::Bool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: impl Into<Value>) -> Expr<()> {
        Expr::Literal(value.into())
    }

    #[test]
    fn arithmetic() {
        assert_eq!(add(Value::Int(2), &lit(3_i64), &()), Ok(Value::Int(5)));
        assert_eq!(sub(Value::Int(2), &lit(3_i64), &()), Ok(Value::Int(-1)));
        assert_eq!(mul(Value::Int(4), &lit(3_i64), &()), Ok(Value::Int(12)));
    }

    #[test]
    fn arithmetic_overflow() {
        assert_eq!(
            add(Value::Int(i64::MAX), &lit(1_i64), &()),
            Err(EvalError::Overflow { op: "+" })
        );
        assert_eq!(
            mul(Value::Int(i64::MIN), &lit(-1_i64), &()),
            Err(EvalError::Overflow { op: "*" })
        );
    }

    #[test]
    fn arithmetic_needs_integers() {
        assert!(matches!(
            add(Value::from("1"), &lit(1_i64), &()),
            Err(EvalError::Type { .. })
        ));
        assert!(matches!(
            add(Value::Int(1), &lit(true), &()),
            Err(EvalError::Type { .. })
        ));
    }

    #[test]
    fn comparisons() {
        assert_eq!(eq(Value::from("abcd"), &lit("abcd"), &()), Ok(Value::Bool(true)));
        assert_eq!(ne(Value::Int(1), &lit(2_i64), &()), Ok(Value::Bool(true)));
        assert_eq!(lt(Value::Int(1), &lit(2_i64), &()), Ok(Value::Bool(true)));
        assert_eq!(le(Value::Int(2), &lit(2_i64), &()), Ok(Value::Bool(true)));
        assert_eq!(gt(Value::Int(1), &lit(2_i64), &()), Ok(Value::Bool(false)));
        assert_eq!(ge(Value::Int(1), &lit(2_i64), &()), Ok(Value::Bool(false)));
    }

    #[test]
    fn logic_skips_right_side() {
        // A right side that would fail if evaluated.
        let poison = lit(7_i64);
        assert_eq!(and(Value::Bool(false), &poison, &()), Ok(Value::Bool(false)));
        assert_eq!(or(Value::Bool(true), &poison, &()), Ok(Value::Bool(true)));
        assert!(and(Value::Bool(true), &poison, &()).is_err());
        assert!(or(Value::Bool(false), &poison, &()).is_err());
    }

    #[test]
    fn membership() {
        let items = lit(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(contains(Value::from("a"), &items, &()), Ok(Value::Bool(true)));
        assert_eq!(contains(Value::from("c"), &items, &()), Ok(Value::Bool(false)));
        assert_eq!(
            contains(Value::from("hello"), &lit("ell"), &()),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            contains(Value::from("ell"), &lit("hello"), &()),
            Ok(Value::Bool(false))
        );
    }
}

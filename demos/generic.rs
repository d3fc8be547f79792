use filtrex::{ops, Context, ContextVars, EvalError, Expr, GrammarBuilder, Value};

/// `left ?? right`: the left value unless it is an empty string.
fn coalesce(left: Value, right: &Expr<Context>, ctx: &Context) -> Result<Value, EvalError> {
    match left {
        Value::String(s) if s.is_empty() => right.exec(ctx),
        other => Ok(other),
    }
}

fn main() {
    let parser = GrammarBuilder::standard()
        .operator("??", coalesce)
        .operator("max", |left: Value, right: &Expr<Context>, ctx: &Context| {
            let right = right.exec(ctx)?.as_int()?;
            Ok(Value::Int(left.as_int()?.max(right)))
        })
        .build(ContextVars)
        .expect("failed to build grammar");

    let ctx = Context::new()
        .set("order.qty", 4_i64)
        .set("order.price", 250_i64)
        .set("order.discount", "100");

    for input in [
        "((4+(1+2)+3)+5)==15",
        "({order.qty} * {order.price}) - {order.discount}",
        "({order.qty} - 10) max 0",
        "{str: order.coupon} ?? none",
        "{order.qty} in [1,2,4,8]",
    ] {
        let expr = parser.parse(input).expect("failed to parse expression");
        match expr.exec(&ctx) {
            Ok(value) => println!("{input:<50} => {value}"),
            Err(err) => println!("{input:<50} => error: {err}"),
        }
    }
}

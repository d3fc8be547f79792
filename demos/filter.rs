use filtrex::{Context, ContextVars, GrammarBuilder};

fn main() {
    let parser = GrammarBuilder::filter()
        .build(ContextVars)
        .expect("failed to build grammar");

    let expr = parser
        .parse(r#"({num: user.age} >= 18 && {user.status} == active) || {user.role} in [admin,ops]"#)
        .expect("failed to parse filter");

    println!("{expr}");

    let contexts = [
        Context::new()
            .set("user.age", 25_i64)
            .set("user.status", "active"),
        Context::new().set("user.age", 15_i64).set("user.role", "ops"),
        Context::new().set("user.age", 15_i64),
    ];
    for ctx in &contexts {
        match expr.matches(ctx) {
            Ok(result) => println!("{ctx:?} => {result}"),
            Err(err) => println!("{ctx:?} => error: {err}"),
        }
    }

    // Mixing `&&` and `||` without parentheses is rejected.
    if let Err(err) = parser.parse("{a} == 1 && {b} == 2 || {c} == 3") {
        println!("{err}");
    }
}

use std::sync::Arc;
use std::thread;

use filtrex::{Context, ContextVars, Expr, GrammarBuilder, Parser, Value};

const RULE: &str = "({num: user.age} >= 18 && {user.status} == active) || {user.role} in [admin,ops]";

#[test]
fn evaluate_across_threads() {
    let expr: Arc<Expr<Context>> = Arc::new(
        GrammarBuilder::filter()
            .build(ContextVars)
            .unwrap()
            .parse(RULE)
            .unwrap(),
    );

    let contexts = [
        // adult, active -> true
        Context::new().set("user.age", 25_i64).set("user.status", "active"),
        // minor, active -> false
        Context::new().set("user.age", 15_i64).set("user.status", "active"),
        // minor, but an operator -> true
        Context::new().set("user.age", 15_i64).set("user.role", "ops"),
        // nothing set -> false
        Context::new(),
    ];

    let handles: Vec<_> = contexts
        .into_iter()
        .map(|ctx| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || expr.matches(&ctx).unwrap())
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, [true, false, true, false]);
}

#[test]
fn parse_across_threads() {
    let parser: Arc<Parser<Context>> =
        Arc::new(GrammarBuilder::standard().build(ContextVars).unwrap());

    let handles: Vec<_> = (0..8_i64)
        .map(|i| {
            let parser = Arc::clone(&parser);
            thread::spawn(move || {
                let expr = parser.parse(&format!("({{n}} * {i}) + 1")).unwrap();
                expr.exec(&Context::new().set("n", 3_i64)).unwrap()
            })
        })
        .collect();

    for (i, handle) in (0..8_i64).zip(handles) {
        assert_eq!(handle.join().unwrap(), Value::Int(3 * i + 1));
    }
}

#[test]
fn shared_tree_gives_identical_results() {
    let expr = Arc::new(
        GrammarBuilder::filter()
            .build(ContextVars)
            .unwrap()
            .parse(r#"{path} ~ "^/api/v[0-9]+/" && {method} !in [DELETE,PATCH]"#)
            .unwrap(),
    );
    let ctx = Arc::new(
        Context::new()
            .set("path", "/api/v2/users")
            .set("method", "GET"),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let expr = Arc::clone(&expr);
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || (0..1_000).all(|_| expr.matches(&ctx).unwrap()))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

use std::sync::Arc;
use std::thread;

use filtrex::{Context, ContextVars, GrammarBuilder};

fn main() {
    let expr = Arc::new(
        GrammarBuilder::filter()
            .build(ContextVars)
            .expect("failed to build grammar")
            .parse("{num: user.age} >= 18 && {user.status} == active")
            .expect("failed to parse filter"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || {
                let ctx = Context::new()
                    .set("user.age", 16_i64 + i64::from(i))
                    .set("user.status", "active");
                let result = expr.matches(&ctx);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filtrex::{Context, ContextVars, GrammarBuilder, NoVariables};

/// A filter of `n` comparisons, each on its own field, all joined by `&&`,
/// plus a context that satisfies every one of them.
fn build_filter(n: usize) -> (String, Context) {
    let mut ctx = Context::new();
    let mut clauses = Vec::with_capacity(n);
    for i in 0..n {
        clauses.push(format!("{{num: f{i}}} >= 1"));
        ctx = ctx.set(&format!("f{i}"), 10_i64);
    }
    (clauses.join(" && "), ctx)
}

/// The same clauses nested `depth` groups deep, alternating `&&` and `||`.
fn build_nested(depth: usize) -> String {
    let mut text = "{num: f0} >= 1".to_owned();
    for i in 1..depth {
        let logic = if i % 2 == 0 { "&&" } else { "||" };
        text = format!("({text}) {logic} {{num: f{i}}} >= 1");
    }
    text
}

fn bench_evaluate(c: &mut Criterion) {
    let parser = GrammarBuilder::filter().build(ContextVars).unwrap();
    let mut group = c.benchmark_group("single_eval");

    for &n in &[5, 20, 50] {
        let (text, ctx) = build_filter(n);
        let expr = parser.parse(&text).unwrap();
        group.bench_function(format!("{n}_clauses"), |b| {
            b.iter(|| expr.matches(black_box(&ctx)));
        });

        let expr = parser.parse(&build_nested(n)).unwrap();
        group.bench_function(format!("{n}_nested"), |b| {
            b.iter(|| expr.matches(black_box(&ctx)));
        });
    }

    let expr = parser
        .parse(r#"{path} ~ "^/api/v[0-9]+/users/[0-9]+$" && {method} in [GET,HEAD]"#)
        .unwrap();
    let ctx = Context::new()
        .set("path", "/api/v2/users/1234")
        .set("method", "GET");
    group.bench_function("pattern_and_list", |b| {
        b.iter(|| expr.matches(black_box(&ctx)));
    });

    group.finish();
}

fn bench_arithmetic(c: &mut Criterion) {
    let parser = GrammarBuilder::<()>::standard().build(NoVariables).unwrap();
    let expr = parser.parse("((4+(1+2)+3)+5)*(7-2)==75").unwrap();
    c.bench_function("generic_fold", |b| {
        b.iter(|| expr.exec(black_box(&())));
    });
}

fn bench_parse(c: &mut Criterion) {
    let parser = GrammarBuilder::filter().build(ContextVars).unwrap();
    let mut group = c.benchmark_group("parse");

    for &n in &[5, 20, 50] {
        let (text, _) = build_filter(n);
        group.bench_function(format!("{n}_clauses"), |b| {
            b.iter(|| parser.parse(black_box(&text)).unwrap());
        });
    }

    group.bench_function("grammar_build", |b| {
        b.iter(|| GrammarBuilder::filter().build(ContextVars).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_arithmetic, bench_parse);
criterion_main!(benches);

#![allow(dead_code)]

use std::collections::HashMap;

use filtrex::Context;
use proptest::prelude::*;

// --- Fixed variable schema ---
// Every variable is read as `{num: name}` and holds an integer in -5..=5,
// or is absent (reads as 0).

pub const VARS: &[&str] = &["a", "b", "c", "user.age"];
pub const OPS: &[&str] = &["==", "!=", "<", "<=", ">", ">="];

/// A filter expression with a reference evaluator.
#[derive(Debug, Clone)]
pub enum GenExpr {
    Compare {
        var: &'static str,
        op: &'static str,
        value: i64,
    },
    All(Vec<GenExpr>),
    Any(Vec<GenExpr>),
}

impl GenExpr {
    /// Filter-grammar text for this expression. Nested groups are
    /// parenthesised, the root is not.
    pub fn render(&self) -> String {
        match self {
            GenExpr::Compare { var, op, value } => format!("{{num: {var}}} {op} {value}"),
            GenExpr::All(children) => join(children, " && "),
            GenExpr::Any(children) => join(children, " || "),
        }
    }

    pub fn eval(&self, vars: &GenContext) -> bool {
        match self {
            GenExpr::Compare { var, op, value } => {
                let actual = vars.get(var);
                match *op {
                    "==" => actual == *value,
                    "!=" => actual != *value,
                    "<" => actual < *value,
                    "<=" => actual <= *value,
                    ">" => actual > *value,
                    _ => actual >= *value,
                }
            }
            GenExpr::All(children) => children.iter().all(|c| c.eval(vars)),
            GenExpr::Any(children) => children.iter().any(|c| c.eval(vars)),
        }
    }
}

fn join(children: &[GenExpr], sep: &str) -> String {
    children
        .iter()
        .map(|child| match child {
            GenExpr::Compare { .. } => child.render(),
            _ => format!("({})", child.render()),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

/// Variable values for one evaluation.
#[derive(Debug, Clone)]
pub struct GenContext {
    pub values: HashMap<&'static str, i64>,
}

impl GenContext {
    pub fn get(&self, var: &str) -> i64 {
        self.values.get(var).copied().unwrap_or(0)
    }

    pub fn to_context(&self) -> Context {
        self.values.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

pub fn arb_context() -> impl Strategy<Value = GenContext> {
    prop::collection::vec(prop::option::of(-5_i64..=5), VARS.len()).prop_map(|slots| GenContext {
        values: VARS
            .iter()
            .zip(slots)
            .filter_map(|(var, value)| value.map(|v| (*var, v)))
            .collect(),
    })
}

pub fn arb_leaf() -> impl Strategy<Value = GenExpr> {
    (
        prop::sample::select(VARS),
        prop::sample::select(OPS),
        -5_i64..=5,
    )
        .prop_map(|(var, op, value)| GenExpr::Compare { var, op, value })
}

/// A tree of AND and OR groups over comparisons, bounded depth.
pub fn arb_expr(max_depth: u32) -> impl Strategy<Value = GenExpr> {
    arb_leaf().prop_recursive(max_depth, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..=4).prop_map(GenExpr::All),
            prop::collection::vec(inner, 2..=4).prop_map(GenExpr::Any),
        ]
    })
}

/// Comparisons joined at one level by a mix of `&&` and `||`, with at least
/// one of each.
pub fn arb_mixed_chain() -> impl Strategy<Value = String> {
    (3_usize..=6).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_leaf(), n),
            prop::collection::vec(any::<bool>(), n - 1)
                .prop_filter("needs both combinators", |ands| {
                    ands.iter().any(|&b| b) && ands.iter().any(|&b| !b)
                }),
        )
            .prop_map(|(leaves, ands)| {
                let mut text = leaves[0].render();
                for (leaf, and) in leaves[1..].iter().zip(ands) {
                    text.push_str(if and { " && " } else { " || " });
                    text.push_str(&leaf.render());
                }
                text
            })
    })
}

/// Fragments of filter syntax, valid or not.
pub const FRAGMENTS: &[&str] = &[
    "{", "}", "(", ")", "&&", "||", "==", "!=", ">=", "in", "!in", "~", "num:", "str:", "[a,b]",
    "\"q\"", "\"(\"", "x", "1", "-3", " ", "\\", "é",
];

pub fn arb_fragments() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..16).prop_map(|parts| parts.concat())
}

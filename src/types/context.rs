use std::collections::HashMap;

use super::error::{EvalError, ResolveError};
use super::value::Value;
use super::variable::{Accessor, ValueType, VarFactory};
use crate::parse::parse_integer;

/// A ready-made evaluation context: dot-separated variable paths mapped to
/// [`Value`]s.
///
/// `{num: user.age}` reads the leaf at `user` → `age`. Pair it with
/// [`ContextVars`] when building a parser.
#[derive(Debug, Clone, Default)]
pub struct Context {
    root: HashMap<String, Slot>,
}

#[derive(Debug, Clone)]
enum Slot {
    Leaf(Value),
    Branch(HashMap<String, Slot>),
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Store `value` at `path`, replacing any leaf that sits on the way.
    pub fn insert(&mut self, path: &str, value: Value) {
        let mut segments = path.split('.').peekable();
        let mut map = &mut self.root;
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                map.insert(segment.to_owned(), Slot::Leaf(value));
                return;
            }
            let slot = map
                .entry(segment.to_owned())
                .or_insert_with(|| Slot::Branch(HashMap::new()));
            if let Slot::Leaf(_) = slot {
                *slot = Slot::Branch(HashMap::new());
            }
            map = match slot {
                Slot::Branch(children) => children,
                Slot::Leaf(_) => return,
            };
        }
    }

    /// The leaf at `path`. Paths that stop at a branch are absent.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let (parents, leaf) = match path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };
        let mut map = &self.root;
        for segment in parents.into_iter().flat_map(|p| p.split('.')) {
            match map.get(segment)? {
                Slot::Branch(children) => map = children,
                Slot::Leaf(_) => return None,
            }
        }
        match map.get(leaf)? {
            Slot::Leaf(value) => Some(value),
            Slot::Branch(_) => None,
        }
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (path, value) in iter {
            ctx.insert(path.as_ref(), value.into());
        }
        ctx
    }
}

/// [`VarFactory`] binding variable names to paths in a [`Context`].
///
/// `number` variables read missing paths as `0` and convert string leaves
/// with [`parse_integer`]. `string` variables read missing paths as `""` and
/// render integers and booleans as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextVars;

impl VarFactory<Context> for ContextVars {
    fn resolve(&self, name: &str, ty: ValueType) -> Result<Box<dyn Accessor<Context>>, ResolveError> {
        if name.split('.').any(str::is_empty) {
            return Err(ResolveError::new(format!("invalid variable path '{name}'")));
        }
        Ok(Box::new(PathAccessor {
            path: name.to_owned(),
            ty,
        }))
    }
}

struct PathAccessor {
    path: String,
    ty: ValueType,
}

impl Accessor<Context> for PathAccessor {
    fn get(&self, ctx: &Context) -> Result<Value, EvalError> {
        let Some(value) = ctx.get(&self.path) else {
            return Ok(match self.ty {
                ValueType::Number => Value::Int(0),
                ValueType::String => Value::String(String::new()),
            });
        };
        match (self.ty, value) {
            (ValueType::Number, Value::Int(i)) => Ok(Value::Int(*i)),
            (ValueType::Number, Value::String(s)) => parse_integer(s)
                .map(Value::Int)
                .map_err(|source| EvalError::InvalidInteger {
                    text: s.clone(),
                    source,
                }),
            (ValueType::String, Value::String(s)) => Ok(Value::String(s.clone())),
            (ValueType::String, Value::Int(i)) => Ok(Value::String(i.to_string())),
            (ValueType::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),
            (ty, other) => Err(EvalError::type_mismatch(ty.type_name(), other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(ctx: &Context, path: &str, ty: ValueType) -> Result<Value, EvalError> {
        ContextVars.resolve(path, ty).unwrap().get(ctx)
    }

    #[test]
    fn nested_paths() {
        let ctx = Context::new()
            .set("user.profile.age", 25_i64)
            .set("user.profile.name", "alice")
            .set("user.status", "active");
        assert_eq!(ctx.get("user.profile.age"), Some(&Value::Int(25)));
        assert_eq!(ctx.get("user.profile.name"), Some(&Value::from("alice")));
        assert_eq!(ctx.get("user.status"), Some(&Value::from("active")));
        assert_eq!(ctx.get("user.profile"), None);
        assert_eq!(ctx.get("user.missing"), None);
        assert_eq!(ctx.get("user.status.deeper"), None);
    }

    #[test]
    fn nested_write_replaces_leaf() {
        let ctx = Context::new().set("user", "old").set("user.age", 30_i64);
        assert_eq!(ctx.get("user.age"), Some(&Value::Int(30)));
        assert_eq!(ctx.get("user"), None);
    }

    #[test]
    fn later_writes_win() {
        let ctx = Context::new().set("score", 10_i64).set("score", 20_i64);
        assert_eq!(ctx.get("score"), Some(&Value::Int(20)));
    }

    #[test]
    fn collects_from_pairs() {
        let ctx: Context = [("1", "b"), ("key1", "1")].into_iter().collect();
        assert_eq!(ctx.get("1"), Some(&Value::from("b")));
        assert_eq!(ctx.get("key1"), Some(&Value::from("1")));
    }

    #[test]
    fn numbers_default_to_zero_and_parse_strings() {
        let ctx = Context::new().set("a", "42").set("b", 7_i64).set("c", "x1");
        assert_eq!(read(&ctx, "missing", ValueType::Number), Ok(Value::Int(0)));
        assert_eq!(read(&ctx, "a", ValueType::Number), Ok(Value::Int(42)));
        assert_eq!(read(&ctx, "b", ValueType::Number), Ok(Value::Int(7)));
        assert!(matches!(
            read(&ctx, "c", ValueType::Number),
            Err(EvalError::InvalidInteger { ref text, .. }) if text == "x1"
        ));
    }

    #[test]
    fn strings_default_to_empty_and_render_scalars() {
        let ctx = Context::new().set("n", 7_i64).set("t", true).set("s", "hi");
        assert_eq!(read(&ctx, "missing", ValueType::String), Ok(Value::from("")));
        assert_eq!(read(&ctx, "n", ValueType::String), Ok(Value::from("7")));
        assert_eq!(read(&ctx, "t", ValueType::String), Ok(Value::from("true")));
        assert_eq!(read(&ctx, "s", ValueType::String), Ok(Value::from("hi")));
    }

    #[test]
    fn unsuitable_leaf_is_a_type_error() {
        let ctx = Context::new().set("flag", true);
        assert_eq!(
            read(&ctx, "flag", ValueType::Number),
            Err(EvalError::Type {
                expected: "integer",
                found: "boolean"
            })
        );
    }

    #[test]
    fn malformed_paths_do_not_resolve() {
        for path in ["a..b", ".a", "a."] {
            assert!(ContextVars.resolve(path, ValueType::String).is_err(), "{path}");
        }
    }
}

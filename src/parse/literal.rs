use std::num::ParseIntError;

use regex::Regex;
use winnow::combinator::{alt, opt, preceded, repeat, separated};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{any, one_of, take_till, take_while};

use super::error::LiteralError;
use crate::types::{CompareOp, Value, ValueType};

/// Quote-safe form of `raw`: backslashes and double quotes are escaped.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inverse of [`escape`]. Backslashes before any other character are kept.
#[must_use]
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('"' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Decimal 64-bit integer, optionally signed.
///
/// # Errors
///
/// Returns [`ParseIntError`] for anything else, including overflow.
pub fn parse_integer(text: &str) -> Result<i64, ParseIntError> {
    text.parse()
}

/// Operand of a generic grammar: a quoted string, a list, `true`/`false`,
/// an integer, or else the raw text as a string.
pub(crate) fn decode(text: &str) -> Result<Value, LiteralError> {
    if text.starts_with('"') {
        return quoted(text).map(Value::String);
    }
    if text.starts_with('[') {
        return list(text).map(Value::List);
    }
    match text {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    Ok(parse_integer(text).map_or_else(|_| Value::String(text.to_owned()), Value::Int))
}

/// Right-hand side of `{var} <op> literal`, typed by the operator and the
/// variable's declared type.
pub(crate) fn decode_operand(text: &str, op: CompareOp, ty: ValueType) -> Result<Value, LiteralError> {
    match op {
        CompareOp::Match | CompareOp::NotMatch => {
            let source = string_body(text)?;
            Ok(Value::Pattern(Regex::new(&source)?))
        }
        CompareOp::In | CompareOp::NotIn if text.starts_with('[') => list(text).map(Value::List),
        _ => match ty {
            ValueType::Number => Ok(Value::Int(parse_integer(text)?)),
            ValueType::String => string_body(text).map(Value::String),
        },
    }
}

fn string_body(text: &str) -> Result<String, LiteralError> {
    if text.starts_with('"') {
        quoted(text)
    } else {
        Ok(text.to_owned())
    }
}

fn quoted(text: &str) -> Result<String, LiteralError> {
    string_literal
        .parse(text)
        .map_err(|e| LiteralError::Malformed(e.to_string()))
}

fn list(text: &str) -> Result<Vec<String>, LiteralError> {
    list_literal
        .parse(text)
        .map_err(|e| LiteralError::Malformed(e.to_string()))
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                if !matches!(esc, '"' | '\\') {
                    s.push('\\');
                }
                s.push(esc);
            }
            c => s.push(c),
        }
    }
}

/// Unquoted list element. `\,` `\]` `\"` and `\\` escape; surrounding
/// whitespace is dropped.
fn bare_item(input: &mut &str) -> ModalResult<String> {
    let item: String = repeat(0.., bare_piece).parse_next(input)?;
    Ok(item.trim().to_owned())
}

fn bare_piece<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((
        take_till(1.., (',', ']', '\\')),
        preceded('\\', one_of(['"', '\\', ',', ']']).take()),
        // Any other backslash is kept as written.
        "\\",
    ))
    .parse_next(input)
}

fn list_item(input: &mut &str) -> ModalResult<String> {
    alt(((string_literal, ws).map(|(s, ())| s), bare_item)).parse_next(input)
}

fn list_literal(input: &mut &str) -> ModalResult<Vec<String>> {
    ('[', ws).parse_next(input)?;
    if opt(']').parse_next(input)?.is_some() {
        return Ok(Vec::new());
    }
    let items: Vec<String> = separated(1.., list_item, (',', ws)).parse_next(input)?;
    ']'.parse_next(input)?;
    Ok(items)
}

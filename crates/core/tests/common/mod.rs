//! Shared test helpers for `fieldtag_core` integration tests.

#![allow(unreachable_pub)]

use fieldtag_core::{List, TagError, Value, parse_str};

// ─── Tree rendering ──────────────────────────────────────────────────────────

/// Compact structural rendering of a parsed tag.
///
/// Each argument renders as `<arg [#i]=…>` (positional index) or
/// `<arg [:key]=…>` (keyword or switch), with values as `<ident foo>`,
/// `<number 12>`, `<string 'x'>`, `<bool true>`, `<nil>`, `<switch ~<ident x>>`
/// and `<slice#2 …>`.
#[allow(dead_code)]
pub fn graph(list: &List) -> String {
    let mut out = String::new();
    for (i, arg) in list.args.iter().enumerate() {
        out.push_str("<arg [");
        match &arg.name {
            Some(name) => {
                out.push(':');
                out.push_str(&name.name);
            }
            None => {
                out.push('#');
                out.push_str(&i.to_string());
            }
        }
        out.push_str("]=");
        graph_value(&mut out, &arg.value);
        out.push('>');
    }
    out
}

fn graph_value(out: &mut String, value: &Value) {
    out.push('<');
    match value {
        Value::Nil { .. } => out.push_str("nil"),
        Value::Bool { value, .. } => out.push_str(&format!("bool {value}")),
        Value::Number(n) => out.push_str(&format!("number {}", n.text)),
        Value::String(s) => out.push_str(&format!("string {}", s.quoted)),
        Value::Identifier(i) => out.push_str(&format!("ident {}", i.name)),
        Value::Switch { name, enabled, .. } => {
            out.push_str("switch ");
            out.push(if *enabled { '~' } else { '!' });
            out.push_str(&format!("<ident {}>", name.name));
        }
        Value::Slice { values, .. } => {
            out.push_str(&format!("slice#{} ", values.len()));
            for v in values {
                graph_value(out, v);
            }
        }
    }
    out.push('>');
}

// ─── Parse helpers ───────────────────────────────────────────────────────────

/// Parse `input`, panicking with the error message on failure.
#[allow(dead_code)]
pub fn parse_ok(input: &str) -> List {
    parse_str(input).unwrap_or_else(|e| panic!("parse({input:?}) failed: {e}"))
}

/// Parse `input`, panicking if it succeeds.
#[allow(dead_code)]
pub fn parse_err(input: &str) -> TagError {
    match parse_str(input) {
        Ok(list) => panic!("parse({input:?}) should fail, got {}", graph(&list)),
        Err(e) => e,
    }
}

//! fieldtag core library.
//!
//! Parses compact field-annotation tags such as `12,true,name,~switchField`
//! or `items='foo';'baa'` and binds their values into typed records. The
//! main entry points are [`parse_str`] for parsing, [`resolve`] for
//! splitting arguments, [`bind`] for binding, and [`Tag::fill`] for all
//! three at once.

#![warn(missing_docs)]

/// Record capability traits and the binding algorithm.
pub mod bind;
/// Binding options and run-time record schemas.
pub mod config;
/// The error type shared by every stage.
pub mod error;
/// Tag grammar: scanner, parser, AST, renderer, and related utilities.
pub mod grammar;
/// Positional/keyword split of a parsed tag.
pub mod resolve;
/// Tag lookup and fill entry points.
pub mod tag;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Scanner
pub use grammar::lexer::{LexErrorKind, Lexer, TokKind, Token, tokenize};

// Parser
pub use grammar::parser::{ParseResult, parse_report, parse_str};

// AST
pub use grammar::ast::{Argument, Identifier, List, Number, QuotedString, Value};

// Renderer
pub use grammar::render::render;

// Resolved view
pub use resolve::{ResolvedArgs, resolve};

// Binder
pub use bind::dynamic::{DynField, DynValue, DynamicRecord, FieldType};
pub use bind::{
    Field, FieldError, FieldKind, NameStyle, Record, bind, bind_atomic, ignored_keys,
};

// Config
pub use config::{BindMode, BindOptions, FieldSpec, Schema, SchemaError, UnknownKeys, load_schema_from_str};

// Tags
pub use tag::{Tag, TagSource};

// Errors and diagnostics (re-exported from the diagnostics crate)
pub use error::TagError;
pub use grammar::diag::{Diagnostic, Severity, Span, codes};

// Serialization helpers
pub use grammar::dump::to_pretty_json;

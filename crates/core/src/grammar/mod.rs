/// Tag abstract syntax tree types.
pub mod ast;
/// Character classes used by the scanner.
pub mod classify;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for the AST.
pub mod dump;
/// Tag scanner: a pull-based state machine producing borrowed tokens.
pub mod lexer;
/// Numeric literal classification (signed, unsigned and float readings).
pub mod number;
/// Tag parser: converts tokens into an AST.
pub mod parser;
/// Renderer: converts an AST back to tag text.
pub mod render;

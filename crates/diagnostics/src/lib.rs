//! Diagnostics for fieldtag.
//!
//! Provides [`Diagnostic`], [`Severity`] and [`Span`] types used to report
//! scanner, parser and binder failures in a structured, serializable form.
//! Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the tag is invalid or could not be applied.
    Error,
    /// Warning: the tag was applied but may not do what was intended.
    Warn,
    /// Informational note.
    Info,
}

/// Byte span in the tag text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A diagnostic message produced by the scanner, parser or binder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"TAG1001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the tag text that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"field"`, `"kind"`, `"value"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    let text = match id {
        codes::LEX_BAD_CHARACTER => {
            "The scanner met a character that cannot appear at this point. Tags allow \
             identifiers, numbers, quoted strings, nil/true/false, the ~ and ! switch \
             prefixes, and the separators ',', ';' and '='. Whitespace is only allowed \
             inside quotes."
        }
        codes::LEX_UNTERMINATED_STRING => {
            "A quoted string was opened but the matching closing quote never appeared \
             before the end of the tag."
        }
        codes::LEX_MISSING_VALUE => {
            "An '=' or ';' must be followed by a value, but the tag ended instead."
        }
        codes::SYNTAX_UNEXPECTED_TOKEN => {
            "The token is valid on its own but not at this position. Arguments are \
             separated by ',' and a switch (~name or !name) cannot take a value."
        }
        codes::SYNTAX_INVALID_ESCAPE => {
            "A backslash inside a quoted string must be followed by a recognised escape \
             such as \\n, \\t, \\\\, \\', \\\" or \\xHH."
        }
        codes::NUMBER_INTEGER_OVERFLOW => {
            "The literal looks like an integer but is too large for a 64-bit signed or \
             unsigned integer. Add a fraction or exponent to make it a float."
        }
        codes::NUMBER_ILLEGAL_SYNTAX => {
            "The literal is not a valid signed integer, unsigned integer or float."
        }
        codes::POSITIONAL_AFTER_KEYWORD => {
            "Positional arguments must all come before the first keyword or switch \
             argument."
        }
        codes::BIND_UNKNOWN_FIELD => {
            "A keyword or switch names a field that the target record does not have."
        }
        codes::BIND_INDEX_OUT_OF_RANGE => {
            "There are more positional arguments than fields in the target record."
        }
        codes::BIND_TYPE_MISMATCH => {
            "The value cannot be stored in the field: booleans and switches need a bool \
             field, identifiers and strings a string field, numbers a numeric field with \
             a matching interpretation, and lists a sequence field."
        }
        codes::BIND_VALUE_OUT_OF_RANGE => {
            "The number is valid but does not fit the width of the target field."
        }
        codes::BIND_KEY_IGNORED => {
            "Unknown keys are set to be ignored, so this keyword was skipped. Check its \
             spelling if it was meant to set a field."
        }
        codes::BIND_TAG_SKIPPED => {
            "A tag consisting of exactly '-' means \"ignore this tag\"; the record keeps \
             its current values."
        }
        _ => return None,
    };
    Some(text)
}

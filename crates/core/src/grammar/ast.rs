use serde::{Deserialize, Serialize};

use super::diag::Span;

/// A parsed tag: the ordered arguments of one tag string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct List {
    /// Arguments in source order.
    pub args: Vec<Argument>,
    /// Span of the whole tag text.
    pub span: Span,
}

impl List {
    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether the tag has no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// One comma-separated argument.
///
/// Keyword arguments (`name=value`) and switches (`~name`, `!name`) carry a
/// name; positional arguments do not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Argument {
    /// Key for keyword and switch arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Identifier>,
    /// The argument's value.
    pub value: Value,
    /// Span of the whole argument, name included.
    pub span: Span,
}

impl Argument {
    /// Whether the argument is addressed by name rather than position.
    pub fn is_keyword(&self) -> bool {
        self.name.is_some()
    }

    /// The argument's key, if it has one.
    pub fn key(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.name.as_str())
    }
}

/// A bare name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identifier {
    /// The name as written.
    pub name: String,
    /// Source span.
    pub span: Span,
}

/// A quoted string literal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuotedString {
    /// Source text, quotes and escapes included.
    pub quoted: String,
    /// Content after escape processing.
    pub text: String,
    /// Source span.
    pub span: Span,
}

/// A numeric literal with every interpretation it admits.
///
/// At least one of `int`, `uint` and `float` is always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Number {
    /// Source text.
    pub text: String,
    /// Signed 64-bit reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int: Option<i64>,
    /// Unsigned 64-bit reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uint: Option<u64>,
    /// Double-precision reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float: Option<f64>,
    /// Source span.
    pub span: Span,
}

/// A literal or composite argument value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Value {
    /// `nil`.
    Nil {
        /// Source span.
        span: Span,
    },
    /// `true` or `false`.
    Bool {
        /// The literal's value.
        value: bool,
        /// Source span.
        span: Span,
    },
    /// A classified number.
    Number(Number),
    /// A quoted string.
    String(QuotedString),
    /// A bare identifier used as a value.
    Identifier(Identifier),
    /// Two or more simple values separated by `;`.
    Slice {
        /// Elements in source order.
        values: Vec<Value>,
        /// Span from the first to the last element.
        span: Span,
    },
    /// `~name` or `!name`.
    Switch {
        /// The switched field.
        name: Identifier,
        /// `true` for `~`, `false` for `!`.
        enabled: bool,
        /// Span from the prefix to the end of the name.
        span: Span,
    },
}

impl Value {
    /// Source span of the value.
    pub fn span(&self) -> Span {
        match self {
            Value::Nil { span }
            | Value::Bool { span, .. }
            | Value::Slice { span, .. }
            | Value::Switch { span, .. } => *span,
            Value::Number(n) => n.span,
            Value::String(s) => s.span,
            Value::Identifier(i) => i.span,
        }
    }

    /// Short lowercase name of the value's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil { .. } => "nil",
            Value::Bool { .. } => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Identifier(_) => "identifier",
            Value::Slice { .. } => "slice",
            Value::Switch { .. } => "switch",
        }
    }
}

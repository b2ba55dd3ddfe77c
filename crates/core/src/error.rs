use std::collections::BTreeMap;

use thiserror::Error;

use crate::grammar::diag::{Diagnostic, Span, codes};
use crate::grammar::lexer::{LexErrorKind, Token};

/// Build a `BTreeMap<String, String>` context for a diagnostic.
macro_rules! ctx {
    ($($k:expr => $v:expr),* $(,)?) => {{
        let mut m = BTreeMap::new();
        $(m.insert(String::from($k), String::from($v));)*
        m
    }};
}

/// Every failure the tag pipeline can report.
///
/// Each variant carries a stable diagnostic code and, where one exists, the
/// byte span in the tag text that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TagError {
    /// The scanner rejected the input.
    #[error("{message}")]
    Lexical {
        /// What the scanner tripped over.
        kind: LexErrorKind,
        /// Scanner message, e.g. `bad character U+0040 '@'`.
        message: String,
        /// Location of the offending input.
        span: Span,
    },
    /// A well-formed token in the wrong place, or a bad string escape.
    #[error("{message}")]
    Syntax {
        /// Diagnostic code.
        code: &'static str,
        /// Human-readable message.
        message: String,
        /// Location of the offending token.
        span: Span,
    },
    /// A number literal with no valid reading.
    #[error("{message}")]
    NumericLiteral {
        /// Diagnostic code.
        code: &'static str,
        /// Human-readable message.
        message: String,
        /// Location of the literal.
        span: Span,
    },
    /// A positional argument followed a keyword or switch.
    #[error("positional argument after keyword argument")]
    ArgumentOrder {
        /// Location of the offending positional argument.
        span: Span,
    },
    /// A value could not be written into the target record.
    #[error("{message}")]
    Binding {
        /// Diagnostic code.
        code: &'static str,
        /// Human-readable message.
        message: String,
        /// Target field name, when one was resolved.
        field: Option<String>,
        /// Location of the argument being bound.
        span: Option<Span>,
    },
}

impl TagError {
    pub(crate) fn lexical(kind: LexErrorKind, token: &Token<'_>) -> Self {
        TagError::Lexical {
            kind,
            message: token.text.to_string(),
            span: token.span(),
        }
    }

    pub(crate) fn unexpected(token: &Token<'_>) -> Self {
        TagError::Syntax {
            code: codes::SYNTAX_UNEXPECTED_TOKEN,
            message: format!("unexpected {}", token.describe()),
            span: token.span(),
        }
    }

    pub(crate) fn binding(
        code: &'static str,
        message: impl Into<String>,
        field: Option<&str>,
        span: Option<Span>,
    ) -> Self {
        TagError::Binding {
            code,
            message: message.into(),
            field: field.map(str::to_owned),
            span,
        }
    }

    /// Stable diagnostic code (e.g. `"TAG1001"`).
    pub fn code(&self) -> &'static str {
        match self {
            TagError::Lexical { kind, .. } => kind.code(),
            TagError::ArgumentOrder { .. } => codes::POSITIONAL_AFTER_KEYWORD,
            TagError::Syntax { code, .. }
            | TagError::NumericLiteral { code, .. }
            | TagError::Binding { code, .. } => *code,
        }
    }

    /// Byte span of the offending input, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            TagError::Lexical { span, .. }
            | TagError::Syntax { span, .. }
            | TagError::NumericLiteral { span, .. }
            | TagError::ArgumentOrder { span } => Some(*span),
            TagError::Binding { span, .. } => *span,
        }
    }

    /// Pipeline stage that produced the error.
    pub fn category(&self) -> &'static str {
        match self {
            TagError::Lexical { .. } => "lexical",
            TagError::Syntax { .. } => "syntax",
            TagError::NumericLiteral { .. } => "number",
            TagError::ArgumentOrder { .. } => "argument-order",
            TagError::Binding { .. } => "binding",
        }
    }

    /// Convert into a structured [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut context = ctx!("category" => self.category());
        if let TagError::Binding {
            field: Some(field), ..
        } = self
        {
            context.insert("field".into(), field.clone());
        }
        Diagnostic::error(self.code(), self.to_string(), self.span()).with_context(context)
    }
}

impl From<TagError> for Diagnostic {
    fn from(err: TagError) -> Self {
        err.to_diagnostic()
    }
}

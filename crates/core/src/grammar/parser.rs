use std::collections::VecDeque;

use log::debug;

use super::{
    ast::{Argument, Identifier, List, Number, QuotedString, Value},
    diag::{Diagnostic, Span, codes},
    lexer::{Lexer, TokKind, Token},
};
use crate::error::TagError;

/// Result of parsing a tag, in report form.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParseResult {
    /// The parsed tree, absent when parsing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<List>,
    /// At most one error diagnostic; parsing stops at the first error.
    pub diagnostics: Vec<Diagnostic>,
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse a tag string into a [`List`].
///
/// Parsing is strict: the first lexical, syntax or numeric error aborts
/// and is returned.
pub fn parse_str(input: &str) -> Result<List, TagError> {
    let list = Parser::new(input).parse()?;
    debug!("parsed {} argument(s) from {input:?}", list.args.len());
    Ok(list)
}

/// Parse a tag string, folding any error into a diagnostic.
pub fn parse_report(input: &str) -> ParseResult {
    match parse_str(input) {
        Ok(list) => ParseResult {
            ast: Some(list),
            diagnostics: Vec::new(),
        },
        Err(err) => ParseResult {
            ast: None,
            diagnostics: vec![err.to_diagnostic()],
        },
    }
}

// ─── Parser Implementation ─────────────────────────────────────────────────

/// Maximum number of buffered lookahead tokens.
const LOOKAHEAD: usize = 3;

struct Parser<'a> {
    lexer: Lexer<'a>,
    ahead: VecDeque<Token<'a>>,
    input_len: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            ahead: VecDeque::with_capacity(LOOKAHEAD),
            input_len: input.len(),
        }
    }

    // ── Token buffer ────────────────────────────────────────────────────

    /// Ensure at least `n` tokens are buffered. Lexical errors surface here,
    /// as soon as the error token is pulled.
    fn fill(&mut self, n: usize) -> Result<(), TagError> {
        debug_assert!(n <= LOOKAHEAD, "lookahead of {n} exceeds {LOOKAHEAD}");
        while self.ahead.len() < n {
            // The scanner is exhausted after its Eof; keep answering Eof.
            let tok = match self.lexer.next() {
                Some(tok) => tok,
                None => self.eof(),
            };
            if let TokKind::Error(kind) = tok.kind {
                return Err(TagError::lexical(kind, &tok));
            }
            self.ahead.push_back(tok);
        }
        Ok(())
    }

    /// Kind of the `n`-th upcoming token (0 = next).
    fn peek_kind(&mut self, n: usize) -> Result<TokKind, TagError> {
        self.fill(n + 1)?;
        Ok(self.ahead[n].kind)
    }

    fn next_token(&mut self) -> Result<Token<'a>, TagError> {
        self.fill(1)?;
        Ok(self.ahead.pop_front().unwrap_or_else(|| self.eof()))
    }

    fn eof(&self) -> Token<'a> {
        Token {
            kind: TokKind::Eof,
            text: "".into(),
            start: self.input_len,
            end: self.input_len,
        }
    }

    /// Consume the next token, which must be of `kind`.
    fn expect(&mut self, kind: TokKind) -> Result<Token<'a>, TagError> {
        let tok = self.next_token()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(TagError::unexpected(&tok))
        }
    }

    // ── Grammar ─────────────────────────────────────────────────────────

    /// `list := ε | argument ("," argument)*`
    fn parse(mut self) -> Result<List, TagError> {
        let mut args = Vec::new();
        if self.peek_kind(0)? != TokKind::Eof {
            loop {
                args.push(self.argument()?);
                let tok = self.next_token()?;
                match tok.kind {
                    TokKind::Eof => break,
                    TokKind::ArgumentSeparator => {
                        if self.peek_kind(0)? == TokKind::Eof {
                            let eof = self.next_token()?;
                            return Err(TagError::unexpected(&eof));
                        }
                    }
                    _ => return Err(TagError::unexpected(&tok)),
                }
            }
        }
        Ok(List {
            args,
            span: Span::new(0, self.input_len),
        })
    }

    /// `argument := switch | identifier "=" value | value`
    fn argument(&mut self) -> Result<Argument, TagError> {
        match self.peek_kind(0)? {
            TokKind::Enable | TokKind::Disable => self.switch(),
            TokKind::Identifier if self.peek_kind(1)? == TokKind::Assign => {
                let name = self.identifier()?;
                self.expect(TokKind::Assign)?;
                let value = self.value()?;
                Ok(Argument {
                    span: name.span.to(value.span()),
                    name: Some(name),
                    value,
                })
            }
            _ => {
                let value = self.value()?;
                Ok(Argument {
                    name: None,
                    span: value.span(),
                    value,
                })
            }
        }
    }

    /// `switch := ("~" | "!") identifier`
    fn switch(&mut self) -> Result<Argument, TagError> {
        let prefix = self.next_token()?;
        let name = self.identifier()?;
        let span = prefix.span().to(name.span);
        Ok(Argument {
            name: Some(name.clone()),
            value: Value::Switch {
                name,
                enabled: prefix.kind == TokKind::Enable,
                span,
            },
            span,
        })
    }

    /// `value := simple (";" simple)*`
    fn value(&mut self) -> Result<Value, TagError> {
        let first = self.simple_value()?;
        if self.peek_kind(0)? != TokKind::ListSeparator {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.peek_kind(0)? == TokKind::ListSeparator {
            self.next_token()?;
            values.push(self.simple_value()?);
        }
        let span = values[0].span().to(values[values.len() - 1].span());
        Ok(Value::Slice { values, span })
    }

    fn simple_value(&mut self) -> Result<Value, TagError> {
        let tok = self.next_token()?;
        let span = tok.span();
        match tok.kind {
            TokKind::Nil => Ok(Value::Nil { span }),
            TokKind::Bool => Ok(Value::Bool {
                value: tok.text == "true",
                span,
            }),
            TokKind::Number => Number::classify(&tok.text, span).map(Value::Number),
            TokKind::String => Ok(Value::String(QuotedString {
                text: unquote(&tok.text, tok.start)?,
                quoted: tok.text.into_owned(),
                span,
            })),
            TokKind::Identifier => Ok(Value::Identifier(Identifier {
                name: tok.text.into_owned(),
                span,
            })),
            _ => Err(TagError::unexpected(&tok)),
        }
    }

    fn identifier(&mut self) -> Result<Identifier, TagError> {
        let tok = self.expect(TokKind::Identifier)?;
        Ok(Identifier {
            span: tok.span(),
            name: tok.text.into_owned(),
        })
    }
}

// ─── String literals ────────────────────────────────────────────────────────

/// Strip the quotes from a string token and process its escapes.
///
/// `offset` is the byte position of the opening quote, used to locate a bad
/// escape in the source.
fn unquote(quoted: &str, offset: usize) -> Result<String, TagError> {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let bad_escape = |end: usize| {
            let start = offset + 1 + i;
            TagError::Syntax {
                code: codes::SYNTAX_INVALID_ESCAPE,
                message: format!("invalid escape sequence {:?}", &quoted[start - offset..end - offset]),
                span: Span::new(start, end),
            }
        };
        let Some((j, e)) = chars.next() else {
            return Err(bad_escape(offset + 1 + inner.len()));
        };
        let after = offset + 1 + j + e.len_utf8();
        let decoded = match e {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' | '\'' | '"' => e,
            'x' | 'u' | 'U' => {
                let width = match e {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let (code, end) = take_digits(&mut chars, width, 16, after, offset)
                    .ok_or_else(|| bad_escape(after))?;
                char::from_u32(code).ok_or_else(|| bad_escape(end))?
            }
            '0'..='7' => {
                let mut code = e.to_digit(8).unwrap_or(0);
                let (rest, end) = take_digits(&mut chars, 2, 8, after, offset)
                    .ok_or_else(|| bad_escape(after))?;
                code = code * 64 + rest;
                if code > 0xFF {
                    return Err(bad_escape(end));
                }
                char::from_u32(code).ok_or_else(|| bad_escape(end))?
            }
            _ => return Err(bad_escape(after)),
        };
        out.push(decoded);
    }
    Ok(out)
}

/// Read exactly `count` digits in `radix`. Returns the value and the source
/// offset just past the last digit.
fn take_digits(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    count: usize,
    radix: u32,
    mut end: usize,
    offset: usize,
) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for _ in 0..count {
        let &(i, c) = chars.peek()?;
        let d = c.to_digit(radix)?;
        chars.next();
        value = value * radix + d;
        end = offset + 1 + i + c.len_utf8();
    }
    Some((value, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_list() {
        let list = parse_str("").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn unquote_simple_escapes() {
        assert_eq!(unquote(r"'a\tb'", 0).unwrap(), "a\tb");
        assert_eq!(unquote(r#""say \"hi\"""#, 0).unwrap(), "say \"hi\"");
        assert_eq!(unquote(r"'it\'s'", 0).unwrap(), "it's");
        assert_eq!(unquote(r"'\\'", 0).unwrap(), "\\");
        assert_eq!(unquote(r"'\a\b\f\n\r\v'", 0).unwrap(), "\u{7}\u{8}\u{c}\n\r\u{b}");
    }

    #[test]
    fn unquote_numeric_escapes() {
        assert_eq!(unquote(r"'\x41'", 0).unwrap(), "A");
        assert_eq!(unquote(r"'\u00e9'", 0).unwrap(), "é");
        assert_eq!(unquote(r"'\U0001F600'", 0).unwrap(), "\u{1F600}");
        assert_eq!(unquote(r"'\101'", 0).unwrap(), "A");
    }

    #[test]
    fn unquote_keeps_non_ascii() {
        assert_eq!(unquote("'héllo'", 0).unwrap(), "héllo");
    }

    #[test]
    fn invalid_escapes_are_located() {
        let err = unquote(r"'ab\q'", 10).unwrap_err();
        assert_eq!(err.code(), codes::SYNTAX_INVALID_ESCAPE);
        assert_eq!(err.span(), Some(Span::new(13, 15)));

        let err = unquote(r"'\x4'", 0).unwrap_err();
        assert_eq!(err.code(), codes::SYNTAX_INVALID_ESCAPE);

        let err = unquote(r"'\uD800'", 0).unwrap_err();
        assert_eq!(err.code(), codes::SYNTAX_INVALID_ESCAPE);

        let err = unquote(r"'\400'", 0).unwrap_err();
        assert_eq!(err.code(), codes::SYNTAX_INVALID_ESCAPE);
    }

    #[test]
    fn lookahead_never_exceeds_bound() {
        let mut p = Parser::new("a=b;c,~d");
        assert_eq!(p.peek_kind(2).unwrap(), TokKind::Identifier);
        assert!(p.ahead.len() <= LOOKAHEAD);
        let list = p.parse().unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn parse_report_folds_error() {
        let report = parse_report("foo=");
        assert!(report.ast.is_none());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].id, codes::LEX_MISSING_VALUE);

        let report = parse_report("foo");
        assert!(report.ast.is_some());
        assert!(report.diagnostics.is_empty());
    }
}

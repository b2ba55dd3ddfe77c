use std::borrow::Cow;

use log::trace;
use serde::Serialize;

use super::classify::{is_ident_continue, is_ident_start, is_numeric_start, is_space};
use crate::grammar::diag::{Span, codes};

/// Classification of a lexical error carried by an error token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LexErrorKind {
    /// A character that cannot appear at the current position.
    BadCharacter,
    /// End of input inside a quoted string.
    UnterminatedString,
    /// End of input directly after `=` or `;`.
    MissingValue,
}

impl LexErrorKind {
    /// Stable diagnostic code for this error.
    pub fn code(self) -> &'static str {
        match self {
            LexErrorKind::BadCharacter => codes::LEX_BAD_CHARACTER,
            LexErrorKind::UnterminatedString => codes::LEX_UNTERMINATED_STRING,
            LexErrorKind::MissingValue => codes::LEX_MISSING_VALUE,
        }
    }
}

/// Classification of a tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokKind {
    /// Lexical error; the token text is the message. Always the last token.
    Error(LexErrorKind),
    /// End of input. Always the last token of a successful scan.
    Eof,
    /// The reserved word `nil`.
    Nil,
    /// The reserved words `true` or `false`.
    Bool,
    /// A numeric literal, not yet validated.
    Number,
    /// A quoted string, quotes included.
    String,
    /// A name: a letter followed by letters, digits, `_` or `-`.
    Identifier,
    /// The `~` switch prefix.
    Enable,
    /// The `!` switch prefix.
    Disable,
    /// `=`
    Assign,
    /// `;`
    ListSeparator,
    /// `,`
    ArgumentSeparator,
}

impl TokKind {
    /// Whether no further tokens follow a token of this kind.
    pub fn is_terminal(self) -> bool {
        matches!(self, TokKind::Eof | TokKind::Error(_))
    }
}

/// A token produced by the [`Lexer`].
///
/// `text` borrows from the input for every kind except [`TokKind::Error`],
/// whose text is the owned error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokKind,
    /// Source text of the token, or the message of an error token.
    pub text: Cow<'a, str>,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token<'_> {
    /// Source span of this token.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Short human-readable description used in parser messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokKind::Eof => "end of input".to_string(),
            TokKind::Error(_) => self.text.to_string(),
            TokKind::Enable | TokKind::Disable => format!("switch prefix '{}'", self.text),
            TokKind::Assign | TokKind::ListSeparator | TokKind::ArgumentSeparator => {
                format!("'{}'", self.text)
            }
            TokKind::Identifier => format!("identifier {:?}", self.text),
            TokKind::String => format!("string {}", self.text),
            TokKind::Number => format!("number {}", self.text),
            TokKind::Nil | TokKind::Bool => format!("{:?}", self.text),
        }
    }
}

/// Scanner states. Each state consumes input, emits at most one token and
/// names the state to run next; `None` stops the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ArgumentStart,
    InArgument,
    Value,
    Identifier,
    Quote,
    Number,
}

/// Pull-based tag scanner.
///
/// Yields tokens lazily in source order and stops after exactly one
/// terminal token ([`TokKind::Eof`] or [`TokKind::Error`]). There is no
/// resynchronization after an error.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
    state: Option<State>,
    pending: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a scanner positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            state: Some(State::ArgumentStart),
            pending: None,
        }
    }

    // ── Cursor helpers ──────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the next character if it is in `valid`.
    fn accept(&mut self, valid: &str) -> bool {
        match self.peek() {
            Some(c) if valid.contains(c) => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    /// Consume a run of characters from `valid`.
    fn accept_run(&mut self, valid: &str) {
        while self.accept(valid) {}
    }

    /// Whether the next character may legally follow an identifier or number.
    fn at_terminator(&self) -> bool {
        match self.peek() {
            None => true,
            Some(c) => is_space(c) || matches!(c, ',' | ';' | '='),
        }
    }

    fn emit(&mut self, kind: TokKind) {
        let text = &self.input[self.start..self.pos];
        trace!("token {kind:?} {text:?} at {}", self.start);
        self.pending = Some(Token {
            kind,
            text: Cow::Borrowed(text),
            start: self.start,
            end: self.pos,
        });
        self.start = self.pos;
    }

    /// Emit an error token spanning `[start, end)` and stop the scan.
    fn error(&mut self, kind: LexErrorKind, start: usize, end: usize, msg: String) -> Option<State> {
        trace!("lex error {kind:?} at {start}: {msg}");
        self.pending = Some(Token {
            kind: TokKind::Error(kind),
            text: Cow::Owned(msg),
            start,
            end,
        });
        None
    }

    fn bad_character(&mut self, c: char, at: usize) -> Option<State> {
        self.error(
            LexErrorKind::BadCharacter,
            at,
            at + c.len_utf8(),
            format!("bad character {}", describe_char(c)),
        )
    }

    // ── States ──────────────────────────────────────────────────────────

    fn step(&mut self, state: State) -> Option<State> {
        match state {
            State::ArgumentStart => self.lex_argument_start(),
            State::InArgument => self.lex_in_argument(),
            State::Value => self.lex_value(),
            State::Identifier => self.lex_identifier(),
            State::Quote => self.lex_quote(),
            State::Number => self.lex_number(),
        }
    }

    /// Start of an argument: a switch prefix or any literal.
    fn lex_argument_start(&mut self) -> Option<State> {
        let Some(c) = self.peek() else {
            self.emit(TokKind::Eof);
            return None;
        };
        if c == '~' || c == '!' {
            let at = self.pos;
            self.bump();
            if !self.peek().is_some_and(is_ident_start) {
                return self.bad_character(c, at);
            }
            self.emit(if c == '!' {
                TokKind::Disable
            } else {
                TokKind::Enable
            });
            return Some(State::Identifier);
        }
        self.literal_start(c)
    }

    /// After `=` or `;`: a literal must follow.
    fn lex_value(&mut self) -> Option<State> {
        match self.peek() {
            None => self.error(
                LexErrorKind::MissingValue,
                self.pos,
                self.pos,
                "assignment missing value".to_string(),
            ),
            Some(c) => self.literal_start(c),
        }
    }

    fn literal_start(&mut self, c: char) -> Option<State> {
        if is_ident_start(c) {
            Some(State::Identifier)
        } else if is_numeric_start(c) {
            Some(State::Number)
        } else if c == '"' || c == '\'' {
            Some(State::Quote)
        } else {
            self.bad_character(c, self.pos)
        }
    }

    /// After a complete value: a separator, `=` or end of input.
    fn lex_in_argument(&mut self) -> Option<State> {
        let at = self.pos;
        match self.bump() {
            None => {
                self.emit(TokKind::Eof);
                None
            }
            Some(',') => {
                self.emit(TokKind::ArgumentSeparator);
                Some(State::ArgumentStart)
            }
            Some(';') => {
                self.emit(TokKind::ListSeparator);
                Some(State::Value)
            }
            Some('=') => {
                self.emit(TokKind::Assign);
                Some(State::Value)
            }
            Some(c) => self.bad_character(c, at),
        }
    }

    fn lex_identifier(&mut self) -> Option<State> {
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        if !self.at_terminator() {
            let at = self.pos;
            // at_terminator() is false only when a character remains.
            let c = self.peek().unwrap_or(char::REPLACEMENT_CHARACTER);
            return self.bad_character(c, at);
        }
        let kind = match &self.input[self.start..self.pos] {
            "true" | "false" => TokKind::Bool,
            "nil" => TokKind::Nil,
            _ => TokKind::Identifier,
        };
        self.emit(kind);
        Some(State::InArgument)
    }

    fn lex_quote(&mut self) -> Option<State> {
        let closing = self.bump();
        loop {
            match self.bump() {
                Some('\\') => {
                    if self.bump().is_none() {
                        break;
                    }
                }
                Some(c) if Some(c) == closing => {
                    self.emit(TokKind::String);
                    return Some(State::InArgument);
                }
                Some(_) => {}
                None => break,
            }
        }
        let (start, end) = (self.start, self.pos);
        self.error(
            LexErrorKind::UnterminatedString,
            start,
            end,
            "unterminated quoted string".to_string(),
        )
    }

    /// Greedy numeric scan. Validity is decided later by
    /// [`Number::classify`](crate::grammar::ast::Number::classify); this only
    /// finds where the literal ends.
    fn lex_number(&mut self) -> Option<State> {
        self.scan_number();
        if !self.at_terminator() {
            let at = self.pos;
            let c = self.peek().unwrap_or(char::REPLACEMENT_CHARACTER);
            return self.bad_character(c, at);
        }
        self.emit(TokKind::Number);
        Some(State::InArgument)
    }

    fn scan_number(&mut self) {
        const DECIMAL: &str = "0123456789_";
        const HEX: &str = "0123456789abcdefABCDEF_";
        self.accept("+-");
        let mut digits = DECIMAL;
        if self.accept("0") {
            if self.accept("xX") {
                digits = HEX;
            } else if self.accept("oO") {
                digits = "01234567_";
            } else if self.accept("bB") {
                digits = "01_";
            }
        }
        self.accept_run(digits);
        if self.accept(".") {
            self.accept_run(digits);
        }
        if digits == DECIMAL && self.accept("eE") {
            self.accept("+-");
            self.accept_run(DECIMAL);
        }
        if digits == HEX && self.accept("pP") {
            self.accept("+-");
            self.accept_run(DECIMAL);
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        while self.pending.is_none() {
            let state = self.state.take()?;
            self.state = self.step(state);
        }
        self.pending.take()
    }
}

/// Tokenize a whole tag, including the terminal token.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Render a character as `U+0040 '@'` for error messages.
fn describe_char(c: char) -> String {
    if c.is_control() {
        format!("U+{:04X}", c as u32)
    } else {
        format!("U+{:04X} '{}'", c as u32, c)
    }
}

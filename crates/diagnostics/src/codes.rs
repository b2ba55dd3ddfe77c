//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection.
//! Codes are grouped by pipeline stage: `TAG10xx` scanner, `TAG11xx` parser,
//! `TAG12xx` numeric literals, `TAG13xx` argument resolution, `TAG14xx`
//! binding.

/// A character that cannot start or continue any token.
pub const LEX_BAD_CHARACTER: &str = "TAG1001";
/// A quoted string reached end of input before its closing quote.
pub const LEX_UNTERMINATED_STRING: &str = "TAG1002";
/// `=` or `;` was followed by end of input.
pub const LEX_MISSING_VALUE: &str = "TAG1003";

/// A well-formed token appeared where the grammar does not allow it.
pub const SYNTAX_UNEXPECTED_TOKEN: &str = "TAG1101";
/// A backslash escape inside a quoted string is not recognised.
pub const SYNTAX_INVALID_ESCAPE: &str = "TAG1102";

/// Integer-looking literal too large for any integer representation.
pub const NUMBER_INTEGER_OVERFLOW: &str = "TAG1201";
/// Literal has no valid integer, unsigned or float interpretation.
pub const NUMBER_ILLEGAL_SYNTAX: &str = "TAG1202";

/// A positional argument follows a keyword or switch argument.
pub const POSITIONAL_AFTER_KEYWORD: &str = "TAG1301";

/// A keyword argument names no field of the target record.
pub const BIND_UNKNOWN_FIELD: &str = "TAG1401";
/// A positional argument has no field at its ordinal index.
pub const BIND_INDEX_OUT_OF_RANGE: &str = "TAG1402";
/// The value kind cannot be written to the field kind.
pub const BIND_TYPE_MISMATCH: &str = "TAG1403";
/// A number does not fit the width of the target field.
pub const BIND_VALUE_OUT_OF_RANGE: &str = "TAG1404";
/// A keyword with no matching field was skipped (warning).
pub const BIND_KEY_IGNORED: &str = "TAG1405";
/// The tag was the `-` sentinel and nothing was bound (info).
pub const BIND_TAG_SKIPPED: &str = "TAG1406";

/// Every known code, in numeric order.
pub const ALL: &[&str] = &[
    LEX_BAD_CHARACTER,
    LEX_UNTERMINATED_STRING,
    LEX_MISSING_VALUE,
    SYNTAX_UNEXPECTED_TOKEN,
    SYNTAX_INVALID_ESCAPE,
    NUMBER_INTEGER_OVERFLOW,
    NUMBER_ILLEGAL_SYNTAX,
    POSITIONAL_AFTER_KEYWORD,
    BIND_UNKNOWN_FIELD,
    BIND_INDEX_OUT_OF_RANGE,
    BIND_TYPE_MISMATCH,
    BIND_VALUE_OUT_OF_RANGE,
    BIND_KEY_IGNORED,
    BIND_TAG_SKIPPED,
];

//! Character classes used by the scanner.

/// Whether `c` is a whitespace character that terminates a token.
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Whether `c` can begin a numeric literal.
pub fn is_numeric_start(c: char) -> bool {
    c == '+' || c == '-' || c.is_ascii_digit()
}

/// Whether `c` is a letter.
///
/// Letter-like numerals such as `Ⅳ` are alphabetic to Unicode but count as
/// numbers here, not letters.
fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

/// Whether `c` can continue an identifier started by a letter.
///
/// Hyphens are accepted so kebab-case keys scan as one identifier. Only
/// ASCII digits count as digits; superscripts, fractions and non-Latin
/// digit forms do not.
pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '-' || c.is_ascii_digit() || is_letter(c)
}

/// Whether `c` can begin an identifier (or a reserved word).
pub fn is_ident_start(c: char) -> bool {
    is_letter(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces() {
        for c in [' ', '\t', '\r', '\n'] {
            assert!(is_space(c), "{c:?} should be a space");
        }
        assert!(!is_space('x'));
        assert!(!is_space('\u{a0}'));
    }

    #[test]
    fn numeric_start() {
        assert!(is_numeric_start('+'));
        assert!(is_numeric_start('-'));
        assert!(is_numeric_start('0'));
        assert!(is_numeric_start('9'));
        assert!(!is_numeric_start('.'));
        assert!(!is_numeric_start('x'));
    }

    #[test]
    fn identifier_classes() {
        assert!(is_ident_start('a'));
        assert!(is_ident_start('é'));
        assert!(!is_ident_start('_'));
        assert!(!is_ident_start('1'));
        assert!(is_ident_continue('_'));
        assert!(is_ident_continue('-'));
        assert!(is_ident_continue('7'));
        assert!(!is_ident_continue('='));
        assert!(!is_ident_continue(';'));
    }

    #[test]
    fn numeric_symbols_are_not_identifier_characters() {
        for c in ['\u{b2}', '\u{bd}', '\u{2163}', '\u{663}'] {
            assert!(!is_ident_start(c), "{c:?} should not start an identifier");
            assert!(!is_ident_continue(c), "{c:?} should not continue an identifier");
        }
        assert!(is_ident_continue('\u{3b1}'));
    }
}

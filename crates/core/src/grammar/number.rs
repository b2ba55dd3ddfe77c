//! Numeric literal classification.
//!
//! A literal is read three ways, as a signed 64-bit integer, an unsigned
//! 64-bit integer and a double. Integer syntax follows base-prefix rules
//! (`0x`, `0o`, `0b`, and a bare leading `0` for octal), with `_` allowed
//! between digits only.

use log::trace;

use super::ast::Number;
use super::diag::{Span, codes};
use crate::error::TagError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumError {
    Syntax,
    Range,
}

impl Number {
    /// Classify `text` into every interpretation it admits.
    ///
    /// Integer readings are tried first. A float reading is derived from a
    /// successful integer reading, or parsed directly; a directly parsed
    /// float back-fills integer readings when it is an exact whole number.
    /// Text without a fraction or exponent is never accepted as a float
    /// alone; if it is too large for both integer types it is rejected as an
    /// integer overflow.
    pub fn classify(text: &str, span: Span) -> Result<Number, TagError> {
        let uint_reading = parse_uint(text);
        let int_reading = parse_int(text);
        let overflowed = uint_reading == Err(NumError::Range) || int_reading == Err(NumError::Range);
        let mut uint = uint_reading.ok();
        let mut int = int_reading.ok();
        if int == Some(0) {
            // "-0" has no unsigned spelling but is still zero.
            uint = Some(0);
        }
        let float = if let Some(i) = int {
            Some(i as f64)
        } else if let Some(u) = uint {
            Some(u as f64)
        } else {
            match parse_float(text) {
                Ok(_) if !text.contains(['.', 'e', 'E', 'p', 'P']) => {
                    // Integer-shaped text never falls back to a float.
                    let (code, message) = if overflowed {
                        (codes::NUMBER_INTEGER_OVERFLOW, format!("integer overflow: {text:?}"))
                    } else {
                        (codes::NUMBER_ILLEGAL_SYNTAX, format!("illegal number syntax: {text:?}"))
                    };
                    return Err(TagError::NumericLiteral {
                        code,
                        message,
                        span,
                    });
                }
                Ok(f) => {
                    if is_exact_i64(f) {
                        int = Some(f as i64);
                    }
                    if is_exact_u64(f) {
                        uint = Some(f as u64);
                    }
                    Some(f)
                }
                Err(_) => None,
            }
        };
        if int.is_none() && uint.is_none() && float.is_none() {
            return Err(TagError::NumericLiteral {
                code: codes::NUMBER_ILLEGAL_SYNTAX,
                message: format!("illegal number syntax: {text:?}"),
                span,
            });
        }
        trace!("number {text:?}: int={int:?} uint={uint:?} float={float:?}");
        Ok(Number {
            text: text.to_string(),
            int,
            uint,
            float,
            span,
        })
    }
}

fn is_exact_i64(f: f64) -> bool {
    f.fract() == 0.0 && (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f)
}

fn is_exact_u64(f: f64) -> bool {
    f.fract() == 0.0 && (0.0..18_446_744_073_709_551_616.0).contains(&f)
}

/// Split off the base prefix. A lone leading `0` selects octal.
fn split_base(s: &str) -> (u32, &str) {
    let b = s.as_bytes();
    if b.first() != Some(&b'0') {
        return (10, s);
    }
    if b.len() >= 3 {
        match b[1].to_ascii_lowercase() {
            b'b' => return (2, &s[2..]),
            b'o' => return (8, &s[2..]),
            b'x' => return (16, &s[2..]),
            _ => {}
        }
    }
    (8, &s[1..])
}

/// Unsigned integer with base prefix detection. Signs are rejected.
fn parse_uint(text: &str) -> Result<u64, NumError> {
    if text.is_empty() {
        return Err(NumError::Syntax);
    }
    let (base, digits) = split_base(text);
    let mut underscores = false;
    let mut n: u64 = 0;
    for c in digits.chars() {
        if c == '_' {
            underscores = true;
            continue;
        }
        let d = c.to_digit(base).ok_or(NumError::Syntax)?;
        n = n
            .checked_mul(u64::from(base))
            .and_then(|n| n.checked_add(u64::from(d)))
            .ok_or(NumError::Range)?;
    }
    if underscores && !underscores_ok(text) {
        return Err(NumError::Syntax);
    }
    Ok(n)
}

/// Signed integer: optional sign followed by an unsigned literal.
fn parse_int(text: &str) -> Result<i64, NumError> {
    let (neg, body) = match text.as_bytes().first() {
        Some(b'+') => (false, &text[1..]),
        Some(b'-') => (true, &text[1..]),
        _ => (false, text),
    };
    let magnitude = parse_uint(body)?;
    const CUTOFF: u64 = 1 << 63;
    if neg {
        if magnitude > CUTOFF {
            return Err(NumError::Range);
        }
        Ok(0i64.wrapping_sub_unsigned(magnitude))
    } else {
        i64::try_from(magnitude).map_err(|_| NumError::Range)
    }
}

/// Float in decimal (`1.5e3`) or hexadecimal (`0x1.8p3`) notation.
fn parse_float(text: &str) -> Result<f64, NumError> {
    let (neg, body) = match text.as_bytes().first() {
        Some(b'+') => (false, &text[1..]),
        Some(b'-') => (true, &text[1..]),
        _ => (false, text),
    };
    if body.contains('_') && !underscores_ok(text) {
        return Err(NumError::Syntax);
    }
    let body = body.replace('_', "");
    let value = if body.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("0x")) {
        parse_hex_float(&body[2..])?
    } else {
        parse_decimal_float(&body)?
    };
    if value.is_nan() {
        return Err(NumError::Syntax);
    }
    if value.is_infinite() {
        return Err(NumError::Range);
    }
    Ok(if neg { -value } else { value })
}

fn parse_decimal_float(body: &str) -> Result<f64, NumError> {
    let bytes = body.as_bytes();
    let mut i = 0;
    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return Err(NumError::Syntax);
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return Err(NumError::Syntax);
        }
    }
    if i != bytes.len() {
        return Err(NumError::Syntax);
    }
    body.parse::<f64>().map_err(|_| NumError::Syntax)
}

/// Hex mantissa with an optional fraction and a mandatory binary exponent.
fn parse_hex_float(body: &str) -> Result<f64, NumError> {
    let (mantissa, exponent) = body
        .split_once(['p', 'P'])
        .ok_or(NumError::Syntax)?;
    let (whole, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(NumError::Syntax);
    }
    let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumError::Syntax);
    }

    // Keep at most 16 significant hex digits (64 bits); the rest only
    // shift the binary exponent.
    let mut bits: u64 = 0;
    let mut kept = 0;
    let mut scale: i64 = 0;
    for (i, c) in whole.chars().chain(frac.chars()).enumerate() {
        let d = c.to_digit(16).ok_or(NumError::Syntax)?;
        let in_fraction = i >= whole.len();
        if bits == 0 && d == 0 {
            if in_fraction {
                scale -= 4;
            }
        } else if kept < 16 {
            bits = (bits << 4) | u64::from(d);
            kept += 1;
            if in_fraction {
                scale -= 4;
            }
        } else if !in_fraction {
            scale += 4;
        }
    }
    if bits == 0 {
        return Ok(0.0);
    }

    // Past this magnitude the result is zero or infinite either way.
    const LIMIT: i64 = 10_000;
    let exp = digits.parse::<i64>().unwrap_or(LIMIT).min(LIMIT);
    let exp = if exponent.starts_with('-') { -exp } else { exp };
    let scale = (scale + exp).clamp(-LIMIT, LIMIT) as i32;
    Ok(scale_by_pow2(bits as f64, scale))
}

/// `value * 2^exp` in steps that stay finite for every finite result, so a
/// nonzero `value` never meets an infinite or zero factor.
fn scale_by_pow2(mut value: f64, mut exp: i32) -> f64 {
    const STEP: i32 = 1000;
    while exp > STEP {
        value *= 2f64.powi(STEP);
        exp -= STEP;
    }
    while exp < -STEP {
        value *= 2f64.powi(-STEP);
        exp += STEP;
    }
    value * 2f64.powi(exp)
}

/// Underscores may only separate digits (a base prefix counts as a digit).
fn underscores_ok(text: &str) -> bool {
    #[derive(PartialEq)]
    enum Saw {
        Start,
        Digit,
        Underscore,
        Other,
    }
    let s = text.strip_prefix(['+', '-']).unwrap_or(text);
    let b = s.as_bytes();
    let mut saw = Saw::Start;
    let mut i = 0;
    let mut hex = false;
    if b.len() >= 2 && b[0] == b'0' && matches!(b[1].to_ascii_lowercase(), b'b' | b'o' | b'x') {
        i = 2;
        saw = Saw::Digit;
        hex = b[1].to_ascii_lowercase() == b'x';
    }
    for &c in &b[i..] {
        if c.is_ascii_digit() || (hex && c.is_ascii_hexdigit()) {
            saw = Saw::Digit;
            continue;
        }
        if c == b'_' {
            if saw != Saw::Digit {
                return false;
            }
            saw = Saw::Underscore;
            continue;
        }
        if saw == Saw::Underscore {
            return false;
        }
        saw = Saw::Other;
    }
    saw != Saw::Underscore
}

//! String-literal sniffing: deciding whether a string operand participates
//! in arithmetic as an integer, a real, or a complex number, and parsing it.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::rowcore::error::{EngineError, EngineResult};
use crate::rowcore::value::types::Value;

/// True when the trimmed literal is an optionally signed run of ASCII digits.
pub fn is_digits(literal: &str) -> bool {
    let s = literal.trim();
    let s = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// True when the trimmed literal parses as a real number.
///
/// Stricter than `f64::from_str`: textual forms like "inf" and "NaN" are
/// rejected, only digit/sign/point/exponent characters qualify.
pub fn is_number(literal: &str) -> bool {
    let s = literal.trim();
    if s.is_empty() {
        return false;
    }
    s.bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'))
        && s.bytes().any(|b| b.is_ascii_digit())
        && s.parse::<f64>().is_ok()
}

/// True when the trimmed literal is a complex number in `a+bi` form.
pub fn is_complex_literal(literal: &str) -> bool {
    parse_complex(literal).is_some()
}

/// Parses the `a+bi` literal family: "6+3i", "1.5-2e3i", "4i", "-i", "i".
///
/// The split between real and imaginary parts is the last sign that is
/// neither the leading sign nor an exponent sign.
pub fn parse_complex(literal: &str) -> Option<(f64, f64)> {
    let s = literal.trim();
    let body = s.strip_suffix('i')?;
    let bytes = body.as_bytes();
    let mut split = None;
    for pos in (1..bytes.len()).rev() {
        let b = bytes[pos];
        if (b == b'+' || b == b'-') && !matches!(bytes[pos - 1], b'e' | b'E') {
            split = Some(pos);
            break;
        }
    }
    match split {
        Some(pos) => {
            let re = parse_real(&body[..pos])?;
            let im = parse_imaginary(&body[pos..])?;
            Some((re, im))
        }
        None => Some((0.0, parse_imaginary(body)?)),
    }
}

fn parse_real(s: &str) -> Option<f64> {
    if is_number(s) {
        s.trim().parse().ok()
    } else {
        None
    }
}

// "", "+", "-" denote a unit imaginary coefficient ("i", "3+i", "3-i")
fn parse_imaginary(s: &str) -> Option<f64> {
    match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => parse_real(s),
    }
}

/// Interpret a string operand as a number for arithmetic.
///
/// Complex literals win over real ones, digit runs become LONG (or DECIMAL
/// when wider than i64), and remaining real literals become DOUBLE. Anything
/// else is a malformed-number error.
pub fn sniff_number(literal: &str) -> EngineResult<Value> {
    let s = literal.trim();
    if let Some((re, im)) = parse_complex(s) {
        return Ok(Value::Complex(re, im));
    }
    if is_digits(s) {
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Value::Long(n));
        }
        if let Ok(d) = BigDecimal::from_str(s) {
            return Ok(Value::Decimal(d));
        }
    }
    if is_number(s) {
        if let Ok(f) = s.parse::<f64>() {
            return Ok(Value::Double(f));
        }
    }
    Err(EngineError::malformed_number(s))
}

//! Shared numeric machinery for the arithmetic engine: operand resolution
//! into the four computation spaces (i64, f64, decimal, complex), the
//! overflow-detect-then-decimal kernels, and exact decimal division and
//! remainder.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};

use crate::rowcore::error::{EngineError, EngineResult};
use crate::rowcore::value::numeric::sniff_number;
use crate::rowcore::value::types::{date_to_millis, datetime_to_millis, time_to_millis};
use crate::rowcore::value::Value;

/// Fractional digits carried by decimal division before normalization.
pub(crate) const DIVIDE_SCALE: i64 = 128;

pub(crate) const CLASS_LONG: u8 = 0;
pub(crate) const CLASS_DOUBLE: u8 = 1;
pub(crate) const CLASS_BIG: u8 = 2;
pub(crate) const CLASS_COMPLEX: u8 = 3;

/// A scalar operand resolved into its computation space.
#[derive(Debug, Clone)]
pub(crate) enum Num {
    Long(i64),
    Double(f64),
    Big(BigDecimal),
    Complex(f64, f64),
}

impl Num {
    pub(crate) fn class(&self) -> u8 {
        match self {
            Num::Long(_) => CLASS_LONG,
            Num::Double(_) => CLASS_DOUBLE,
            Num::Big(_) => CLASS_BIG,
            Num::Complex(..) => CLASS_COMPLEX,
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        match self {
            Num::Long(v) => *v == 0,
            Num::Double(x) => *x == 0.0,
            Num::Big(d) => d.is_zero(),
            Num::Complex(re, im) => *re == 0.0 && *im == 0.0,
        }
    }

    pub(crate) fn is_one(&self) -> bool {
        match self {
            Num::Long(v) => *v == 1,
            Num::Double(x) => *x == 1.0,
            Num::Big(d) => d.is_one(),
            Num::Complex(re, im) => *re == 1.0 && *im == 0.0,
        }
    }
}

/// Resolves a non-null scalar operand into its computation space.
/// Strings and binaries are sniffed; collections and nulls are rejected.
pub(crate) fn resolve_scalar(operation: &str, value: &Value) -> EngineResult<Num> {
    match value {
        Value::Int(i) => Ok(Num::Long(*i as i64)),
        Value::Long(l) => Ok(Num::Long(*l)),
        Value::Boolean(b) => Ok(Num::Long(*b as i64)),
        Value::Float(x) => Ok(Num::Double(*x as f64)),
        Value::Double(x) | Value::Numeric(x) => Ok(Num::Double(*x)),
        Value::Decimal(d) => Ok(Num::Big(d.clone())),
        Value::Instant(d) => Ok(Num::Big(d.clone())),
        Value::Complex(re, im) => Ok(Num::Complex(*re, *im)),
        Value::Date(d) => Ok(Num::Long(date_to_millis(*d))),
        Value::Time(t) | Value::CalendarTime(t) => Ok(Num::Long(time_to_millis(*t))),
        Value::Timestamp(ts) | Value::CalendarTimestamp(ts) => {
            Ok(Num::Long(datetime_to_millis(*ts)))
        }
        Value::String(s) => resolve_sniffed(sniff_number(s)?),
        Value::Binary(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => resolve_sniffed(sniff_number(s)?),
            Err(_) => Err(EngineError::malformed_number("<binary>")),
        },
        other => Err(EngineError::type_mismatch(
            operation,
            other.type_name(),
            Some(other.display_snippet()),
        )),
    }
}

fn resolve_sniffed(value: Value) -> EngineResult<Num> {
    match value {
        Value::Long(l) => Ok(Num::Long(l)),
        Value::Double(x) => Ok(Num::Double(x)),
        Value::Decimal(d) => Ok(Num::Big(d)),
        Value::Complex(re, im) => Ok(Num::Complex(re, im)),
        other => Err(EngineError::malformed_number(other.to_string())),
    }
}

/// Turns a computed result back into a value.
pub(crate) fn materialize(n: Num) -> Value {
    match n {
        Num::Long(v) => Value::Long(v),
        Num::Double(x) => Value::Double(x),
        Num::Big(d) => Value::Decimal(d),
        Num::Complex(re, im) => Value::Complex(re, im),
    }
}

pub(crate) fn as_long(n: &Num) -> i64 {
    match n {
        Num::Long(v) => *v,
        Num::Double(x) => *x as i64,
        Num::Big(d) => d.to_i64().unwrap_or(0),
        Num::Complex(re, _) => *re as i64,
    }
}

pub(crate) fn as_double(n: &Num) -> f64 {
    match n {
        Num::Long(v) => *v as f64,
        Num::Double(x) => *x,
        Num::Big(d) => d.to_f64().unwrap_or(f64::NAN),
        Num::Complex(re, _) => *re,
    }
}

pub(crate) fn as_complex(n: &Num) -> (f64, f64) {
    match n {
        Num::Complex(re, im) => (*re, *im),
        other => (as_double(other), 0.0),
    }
}

/// Decimal view of an operand; non-finite floats cannot enter decimal
/// space and overflow instead.
pub(crate) fn as_big(operation: &str, n: &Num) -> EngineResult<BigDecimal> {
    match n {
        Num::Long(v) => Ok(BigDecimal::from(*v)),
        Num::Double(x) => BigDecimal::from_f64(*x).ok_or_else(|| {
            EngineError::numeric_overflow(operation, "non-finite operand in decimal arithmetic")
        }),
        Num::Big(d) => Ok(d.clone()),
        Num::Complex(re, _) => BigDecimal::from_f64(*re).ok_or_else(|| {
            EngineError::numeric_overflow(operation, "non-finite operand in decimal arithmetic")
        }),
    }
}

// --- i64 kernels: detect overflow, recompute in decimal ---

pub(crate) fn add_longs(a: i64, b: i64) -> Num {
    match a.checked_add(b) {
        Some(r) => Num::Long(r),
        None => Num::Big(BigDecimal::from(a) + BigDecimal::from(b)),
    }
}

pub(crate) fn sub_longs(a: i64, b: i64) -> Num {
    match a.checked_sub(b) {
        Some(r) => Num::Long(r),
        None => Num::Big(BigDecimal::from(a) - BigDecimal::from(b)),
    }
}

pub(crate) fn mul_longs(operation: &str, a: i64, b: i64) -> EngineResult<Num> {
    match a.checked_mul(b) {
        Some(r) => Ok(Num::Long(r)),
        None => Ok(Num::Big(mul_big(
            operation,
            &BigDecimal::from(a),
            &BigDecimal::from(b),
        )?)),
    }
}

// --- f64 kernels: finite operands overflowing f64 recompute in decimal ---

pub(crate) fn add_doubles(a: f64, b: f64) -> Num {
    let r = a + b;
    if r.is_finite() || !(a.is_finite() && b.is_finite()) {
        Num::Double(r)
    } else {
        Num::Big(finite_to_big(a) + finite_to_big(b))
    }
}

pub(crate) fn sub_doubles(a: f64, b: f64) -> Num {
    let r = a - b;
    if r.is_finite() || !(a.is_finite() && b.is_finite()) {
        Num::Double(r)
    } else {
        Num::Big(finite_to_big(a) - finite_to_big(b))
    }
}

pub(crate) fn mul_doubles(operation: &str, a: f64, b: f64) -> EngineResult<Num> {
    let r = a * b;
    if r.is_finite() || !(a.is_finite() && b.is_finite()) {
        Ok(Num::Double(r))
    } else {
        Ok(Num::Big(mul_big(
            operation,
            &finite_to_big(a),
            &finite_to_big(b),
        )?))
    }
}

// only called with values already checked finite
fn finite_to_big(x: f64) -> BigDecimal {
    BigDecimal::from_f64(x).unwrap_or_default()
}

// --- decimal kernels ---

/// Exact decimal multiply; a product whose sign disagrees with the operand
/// signs is reported as overflow.
pub(crate) fn mul_big(
    operation: &str,
    a: &BigDecimal,
    b: &BigDecimal,
) -> EngineResult<BigDecimal> {
    let product = a * b;
    if a.is_zero() || b.is_zero() {
        return Ok(product);
    }
    let expected_negative = (a.sign() == Sign::Minus) != (b.sign() == Sign::Minus);
    let actual_negative = product.sign() == Sign::Minus;
    if product.is_zero() || expected_negative != actual_negative {
        return Err(EngineError::numeric_overflow(
            operation,
            "product sign is inconsistent with the operand signs",
        ));
    }
    Ok(product)
}

/// Decimal division at 128 fractional digits with HALF_UP rounding,
/// normalized, with the same sign check as multiply. The divisor must be
/// nonzero.
pub(crate) fn div_big(operation: &str, a: &BigDecimal, b: &BigDecimal) -> EngineResult<BigDecimal> {
    let (a_int, a_scale) = a.as_bigint_and_exponent();
    let (b_int, b_scale) = b.as_bigint_and_exponent();
    // a/b = (a_int / b_int) × 10^(b_scale - a_scale); shift the numerator
    // so the integer quotient carries DIVIDE_SCALE fractional digits
    let shift = DIVIDE_SCALE + b_scale - a_scale;
    let (numerator, denominator) = if shift >= 0 {
        (a_int * pow10(operation, shift)?, b_int)
    } else {
        (a_int, b_int * pow10(operation, -shift)?)
    };
    let digits = div_round_half_up(numerator, denominator);
    let quotient = BigDecimal::new(digits, DIVIDE_SCALE).normalized();
    if !a.is_zero() {
        let expected_negative = (a.sign() == Sign::Minus) != (b.sign() == Sign::Minus);
        let actual = quotient.sign();
        // a quotient rounded all the way to zero is fine; a flipped sign
        // is not
        if actual != Sign::NoSign && (actual == Sign::Minus) != expected_negative {
            return Err(EngineError::numeric_overflow(
                operation,
                "quotient sign is inconsistent with the operand signs",
            ));
        }
    }
    Ok(quotient)
}

/// Exact decimal remainder with the dividend's sign, computed in integer
/// space without any rounded division. The divisor must be nonzero.
pub(crate) fn rem_big(operation: &str, a: &BigDecimal, b: &BigDecimal) -> EngineResult<BigDecimal> {
    let (a_int, a_scale) = a.as_bigint_and_exponent();
    let (b_int, b_scale) = b.as_bigint_and_exponent();
    // align both operands to the wider scale, take the integer remainder
    let scale = a_scale.max(b_scale);
    let a_aligned = a_int * pow10(operation, scale - a_scale)?;
    let b_aligned = b_int * pow10(operation, scale - b_scale)?;
    let remainder = &a_aligned % &b_aligned;
    Ok(BigDecimal::new(remainder, scale).normalized())
}

fn pow10(operation: &str, exponent: i64) -> EngineResult<BigInt> {
    let exponent = u32::try_from(exponent)
        .map_err(|_| EngineError::numeric_overflow(operation, "decimal scale shift is too large"))?;
    Ok(BigInt::from(10u32).pow(exponent))
}

fn div_round_half_up(numerator: BigInt, denominator: BigInt) -> BigInt {
    let quotient = &numerator / &denominator;
    let remainder = &numerator % &denominator;
    if remainder.is_zero() {
        return quotient;
    }
    // |2r| >= |d| rounds away from zero
    let doubled = remainder.magnitude() * 2u32;
    if doubled >= *denominator.magnitude() {
        let negative = (numerator.sign() == Sign::Minus) != (denominator.sign() == Sign::Minus);
        if negative {
            quotient - 1
        } else {
            quotient + 1
        }
    } else {
        quotient
    }
}

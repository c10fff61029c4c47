//! Unary math over values: the floating family (roots, exponentials,
//! logarithms, trigonometry) plus the variant-preserving abs and negate.

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::rowcore::error::{EngineError, EngineResult};
use crate::rowcore::value::numeric::sniff_number;
use crate::rowcore::value::tag::TypeTag;
use crate::rowcore::value::Value;

use super::numeric::{as_double, resolve_scalar, Num};

/// Absolute value, preserving the operand's numeric variant and widening
/// on overflow (`Int::MIN` becomes a Long, `Long::MIN` a Decimal). The
/// absolute value of a complex number is its modulus.
pub fn abs(value: &Value) -> EngineResult<Value> {
    signed_unary("abs", value, false)
}

/// Arithmetic negation, preserving the operand's numeric variant and
/// widening on overflow.
pub fn negate(value: &Value) -> EngineResult<Value> {
    signed_unary("negate", value, true)
}

pub fn sqrt(value: &Value) -> EngineResult<Value> {
    float_unary("sqrt", value, |x| if x < 0.0 { None } else { Some(x.sqrt()) })
}

pub fn cbrt(value: &Value) -> EngineResult<Value> {
    float_unary("cbrt", value, |x| Some(x.cbrt()))
}

pub fn exp(value: &Value) -> EngineResult<Value> {
    float_unary("exp", value, |x| Some(x.exp()))
}

pub fn expm1(value: &Value) -> EngineResult<Value> {
    float_unary("expm1", value, |x| Some(x.exp_m1()))
}

pub fn ln(value: &Value) -> EngineResult<Value> {
    float_unary("ln", value, |x| if x <= 0.0 { None } else { Some(x.ln()) })
}

/// Logarithm of `value` in an arbitrary scalar `base`.
pub fn log(value: &Value, base: &Value) -> EngineResult<Value> {
    if base.is_null() {
        return Ok(Value::Null(TypeTag::Double));
    }
    let b = scalar_argument("log", base)?;
    float_unary("log", value, move |x| {
        if x <= 0.0 || b <= 0.0 || b == 1.0 {
            None
        } else {
            Some(x.log(b))
        }
    })
}

pub fn log10(value: &Value) -> EngineResult<Value> {
    float_unary("log10", value, |x| if x <= 0.0 { None } else { Some(x.log10()) })
}

pub fn sin(value: &Value) -> EngineResult<Value> {
    float_unary("sin", value, |x| Some(x.sin()))
}

pub fn cos(value: &Value) -> EngineResult<Value> {
    float_unary("cos", value, |x| Some(x.cos()))
}

pub fn tan(value: &Value) -> EngineResult<Value> {
    float_unary("tan", value, |x| Some(x.tan()))
}

/// Arc sine. Operands slightly outside [-1, 1] are tolerated: rounded at
/// `border_scale` fractional digits (HALF_UP), a magnitude within 1 clamps
/// to the border; anything further out is a domain violation.
pub fn asin(value: &Value, border_scale: i64) -> EngineResult<Value> {
    float_unary("asin", value, move |x| bordered(x, border_scale, f64::asin))
}

/// Arc cosine with the same border tolerance as [`asin`].
pub fn acos(value: &Value, border_scale: i64) -> EngineResult<Value> {
    float_unary("acos", value, move |x| bordered(x, border_scale, f64::acos))
}

pub fn atan(value: &Value) -> EngineResult<Value> {
    float_unary("atan", value, |x| Some(x.atan()))
}

/// Four-quadrant arc tangent of `y / x` with a scalar `x`.
pub fn atan2(y: &Value, x: &Value) -> EngineResult<Value> {
    if x.is_null() {
        return Ok(Value::Null(TypeTag::Double));
    }
    let xv = scalar_argument("atan2", x)?;
    float_unary("atan2", y, move |yv| Some(yv.atan2(xv)))
}

pub fn sinh(value: &Value) -> EngineResult<Value> {
    float_unary("sinh", value, |x| Some(x.sinh()))
}

pub fn cosh(value: &Value) -> EngineResult<Value> {
    float_unary("cosh", value, |x| Some(x.cosh()))
}

pub fn tanh(value: &Value) -> EngineResult<Value> {
    float_unary("tanh", value, |x| Some(x.tanh()))
}

/// Shared driver for the floating family: nulls keep their tag, keyed and
/// temporal operands are rejected, sequences recurse, everything else
/// resolves to f64. A `None` from the kernel is a domain violation and
/// yields `Null(Double)`.
fn float_unary<F>(operation: &'static str, value: &Value, f: F) -> EngineResult<Value>
where
    F: Fn(f64) -> Option<f64> + Copy,
{
    match value {
        Value::Null(tag) => Ok(Value::Null(*tag)),
        v if v.type_tag().is_keyed() => Err(keyed_unary_error(operation, v)),
        v if v.type_tag().is_temporal() => Err(EngineError::type_mismatch(
            operation,
            v.type_name(),
            Some(v.display_snippet()),
        )),
        Value::List(items) => {
            let out: EngineResult<Vec<Value>> =
                items.iter().map(|item| float_unary(operation, item, f)).collect();
            Ok(Value::List(out?))
        }
        Value::DenseVector(items) => Ok(Value::DenseVector(
            items.iter().map(|&x| f(x).unwrap_or(f64::NAN)).collect(),
        )),
        Value::SparseVector(sv) => {
            if f(0.0) == Some(0.0) {
                // the kernel fixes zero, so implicit zeros stay implicit
                Ok(Value::SparseVector(sv.map_values(|x| f(x).unwrap_or(f64::NAN))))
            } else {
                Ok(Value::DenseVector(
                    (0..sv.len()).map(|i| f(sv.get(i)).unwrap_or(f64::NAN)).collect(),
                ))
            }
        }
        v => {
            let n = resolve_scalar(operation, v)?;
            if let Num::Complex(_, im) = &n {
                if *im != 0.0 {
                    return Err(EngineError::type_mismatch(
                        operation,
                        "COMPLEX",
                        Some(v.display_snippet()),
                    ));
                }
            }
            match f(as_double(&n)) {
                Some(y) => Ok(Value::Double(y)),
                None => Ok(Value::Null(TypeTag::Double)),
            }
        }
    }
}

fn keyed_unary_error(operation: &str, offender: &Value) -> EngineError {
    let hint = if offender.type_tag() == TypeTag::Set {
        "apply the operation element-wise over a LIST instead"
    } else {
        "operate on a selected field instead"
    };
    EngineError::type_mismatch_hint(
        operation,
        offender.type_name(),
        Some(offender.display_snippet()),
        hint,
    )
}

/// Resolves a secondary argument (logarithm base, atan2 divisor) that must
/// be a real scalar.
fn scalar_argument(operation: &'static str, value: &Value) -> EngineResult<f64> {
    if value.type_tag().is_keyed()
        || value.type_tag().is_sequence()
        || value.type_tag().is_temporal()
    {
        return Err(EngineError::type_mismatch_hint(
            operation,
            value.type_name(),
            Some(value.display_snippet()),
            "the argument must be a scalar",
        ));
    }
    let n = resolve_scalar(operation, value)?;
    if let Num::Complex(_, im) = &n {
        if *im != 0.0 {
            return Err(EngineError::type_mismatch(
                operation,
                "COMPLEX",
                Some(value.display_snippet()),
            ));
        }
    }
    Ok(as_double(&n))
}

fn bordered(x: f64, border_scale: i64, f: fn(f64) -> f64) -> Option<f64> {
    if (-1.0..=1.0).contains(&x) {
        return Some(f(x));
    }
    if !x.is_finite() {
        return None;
    }
    let rounded = round_half_up(x, border_scale);
    if rounded.abs() <= 1.0 {
        Some(f(x.clamp(-1.0, 1.0)))
    } else {
        None
    }
}

fn round_half_up(x: f64, scale: i64) -> f64 {
    match BigDecimal::from_f64(x) {
        Some(d) => d.with_scale_round(scale, RoundingMode::HalfUp).to_f64().unwrap_or(x),
        None => x,
    }
}

/// abs/negate driver: keeps the operand's own variant, widening only when
/// the result does not fit.
fn signed_unary(operation: &'static str, value: &Value, negating: bool) -> EngineResult<Value> {
    match value {
        Value::Null(tag) => Ok(Value::Null(*tag)),
        v if v.type_tag().is_keyed() => Err(keyed_unary_error(operation, v)),
        v if v.type_tag().is_temporal() => Err(EngineError::type_mismatch(
            operation,
            v.type_name(),
            Some(v.display_snippet()),
        )),
        Value::List(items) => {
            let out: EngineResult<Vec<Value>> = items
                .iter()
                .map(|item| signed_unary(operation, item, negating))
                .collect();
            Ok(Value::List(out?))
        }
        Value::DenseVector(items) => Ok(Value::DenseVector(
            items.iter().map(|&x| if negating { -x } else { x.abs() }).collect(),
        )),
        Value::SparseVector(sv) => Ok(Value::SparseVector(
            sv.map_values(|x| if negating { -x } else { x.abs() }),
        )),
        Value::Int(i) => {
            let kept = if negating { i.checked_neg() } else { i.checked_abs() };
            Ok(match kept {
                Some(v) => Value::Int(v),
                None => Value::Long(-(*i as i64)),
            })
        }
        Value::Long(l) => {
            let kept = if negating { l.checked_neg() } else { l.checked_abs() };
            Ok(match kept {
                Some(v) => Value::Long(v),
                None => Value::Decimal(-BigDecimal::from(*l)),
            })
        }
        Value::Boolean(b) => {
            let v = *b as i64;
            Ok(Value::Long(if negating { -v } else { v }))
        }
        Value::Float(x) => Ok(Value::Float(if negating { -x } else { x.abs() })),
        Value::Double(x) => Ok(Value::Double(if negating { -x } else { x.abs() })),
        Value::Numeric(x) => Ok(Value::Numeric(if negating { -x } else { x.abs() })),
        Value::Decimal(d) => Ok(Value::Decimal(if negating { -d.clone() } else { d.abs() })),
        Value::Complex(re, im) => Ok(if negating {
            Value::Complex(-re, -im)
        } else {
            // the absolute value of a complex number is its modulus
            Value::Double(re.hypot(*im))
        }),
        Value::String(s) => signed_unary(operation, &sniff_number(s)?, negating),
        Value::Binary(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => signed_unary(operation, &sniff_number(s)?, negating),
            Err(_) => Err(EngineError::malformed_number("<binary>")),
        },
        other => Err(EngineError::type_mismatch(
            operation,
            other.type_name(),
            Some(other.display_snippet()),
        )),
    }
}

//! Exponentiation built on top of the multiply and divide operators, so
//! overflow handling and type promotion stay in one place.

use num_traits::ToPrimitive;

use crate::rowcore::error::{EngineError, EngineResult};
use crate::rowcore::value::tag::TypeTag;
use crate::rowcore::value::Value;

use super::binary::{divide, multiply, operand_class};
use super::numeric::{as_double, resolve_scalar, Num, CLASS_BIG, CLASS_COMPLEX, CLASS_DOUBLE};

/// Largest accepted integer exponent magnitude; anything wider is a
/// runaway computation rather than a useful power.
const MAX_INTEGER_EXPONENT: u64 = 999_999_999;

/// Raises `base` to `exponent`. An integer-valued exponent of zero yields
/// `Int(1)` regardless of base; positive integer exponents evaluate by
/// repeated multiplication with squaring; negative integer exponents
/// compute the positive power and invert it. Non-integer exponents split
/// into an exact integer part and a floating fractional part.
pub fn power(base: &Value, exponent: &Value, null_as_zero: bool) -> EngineResult<Value> {
    // actual collections only; typed nulls fall through to the null rules
    if matches!(base, Value::Set(_) | Value::Map(_)) {
        return Err(keyed_error(base));
    }
    if matches!(exponent, Value::Set(_) | Value::Map(_)) {
        return Err(keyed_error(exponent));
    }
    if matches!(
        exponent,
        Value::List(_) | Value::DenseVector(_) | Value::SparseVector(_)
    ) {
        return Err(EngineError::type_mismatch_hint(
            "power",
            exponent.type_name(),
            Some(exponent.display_snippet()),
            "the exponent must be a scalar",
        ));
    }
    if exponent.is_null() {
        // x^null under null-as-zero is x^0
        if null_as_zero {
            return Ok(Value::Int(1));
        }
        return Ok(Value::Null(null_tag(base)));
    }
    if base.is_null() {
        if null_as_zero {
            return power(&Value::Long(0), exponent, false);
        }
        return Ok(Value::Null(null_tag(base)));
    }
    if base.type_tag().is_sequence() {
        return broadcast_base(base, exponent, null_as_zero);
    }

    let resolved = resolve_scalar("power", exponent)?;
    match integer_exponent(&resolved)? {
        Some(0) => Ok(Value::Int(1)),
        Some(n) if n > 0 => {
            let n = n as u64;
            if n > MAX_INTEGER_EXPONENT {
                return Err(EngineError::numeric_overflow("power", "exponent is too large"));
            }
            integer_power(base, n, null_as_zero)
        }
        Some(n) => {
            let magnitude = n.unsigned_abs();
            if magnitude > MAX_INTEGER_EXPONENT {
                return Err(EngineError::numeric_overflow("power", "exponent is too large"));
            }
            let class = operand_class(base);
            if class == CLASS_BIG || class == CLASS_COMPLEX {
                return Err(EngineError::type_mismatch_hint(
                    "power",
                    base.type_name(),
                    Some(base.display_snippet()),
                    "negative exponents are not supported for this operand",
                ));
            }
            let positive = integer_power(base, magnitude, null_as_zero)?;
            divide(&Value::Int(1), &positive, false)
        }
        None => fractional_power(base, &resolved, null_as_zero),
    }
}

fn keyed_error(offender: &Value) -> EngineError {
    let hint = if offender.type_tag() == TypeTag::Set {
        "apply the operation element-wise over a LIST instead"
    } else {
        "operate on a selected field instead"
    };
    EngineError::type_mismatch_hint(
        "power",
        offender.type_name(),
        Some(offender.display_snippet()),
        hint,
    )
}

fn null_tag(base: &Value) -> TypeTag {
    match operand_class(base) {
        CLASS_DOUBLE => TypeTag::Double,
        CLASS_BIG => TypeTag::Decimal,
        CLASS_COMPLEX => TypeTag::Complex,
        _ => TypeTag::Long,
    }
}

/// The exponent as an exact integer, or `None` when it has a fractional
/// part. Integer-valued floats and decimals count as integers.
fn integer_exponent(exponent: &Num) -> EngineResult<Option<i64>> {
    match exponent {
        Num::Long(n) => Ok(Some(*n)),
        Num::Double(x) => {
            if x.fract() == 0.0 && x.abs() <= 9_007_199_254_740_992.0 {
                Ok(Some(*x as i64))
            } else {
                Ok(None)
            }
        }
        Num::Big(d) => {
            if d.is_integer() {
                match d.to_i64() {
                    Some(n) => Ok(Some(n)),
                    None => Err(EngineError::numeric_overflow("power", "exponent is too large")),
                }
            } else {
                Ok(None)
            }
        }
        Num::Complex(re, im) => {
            if *im == 0.0 {
                integer_exponent(&Num::Double(*re))
            } else {
                Err(EngineError::type_mismatch_hint(
                    "power",
                    "COMPLEX",
                    None,
                    "the exponent must be real",
                ))
            }
        }
    }
}

/// base^n for n >= 1 by squaring, each step going through the multiply
/// operator so overflow falls back to decimal exactly as multiply does.
fn integer_power(base: &Value, mut n: u64, null_as_zero: bool) -> EngineResult<Value> {
    let mut acc: Option<Value> = None;
    let mut square = base.clone();
    loop {
        if n & 1 == 1 {
            acc = Some(match acc {
                None => square.clone(),
                Some(a) => multiply(&a, &square, null_as_zero)?,
            });
        }
        n >>= 1;
        if n == 0 {
            break;
        }
        square = multiply(&square, &square, null_as_zero)?;
    }
    Ok(acc.unwrap_or(Value::Long(1)))
}

/// The hybrid path for non-integer exponents: base^int exactly, base^frac
/// in floating point, multiplied together and inverted for a negative
/// exponent.
fn fractional_power(base: &Value, exponent: &Num, null_as_zero: bool) -> EngineResult<Value> {
    if operand_class(base) == CLASS_COMPLEX {
        return Err(EngineError::type_mismatch_hint(
            "power",
            base.type_name(),
            Some(base.display_snippet()),
            "complex bases accept integer exponents only",
        ));
    }
    let e = as_double(exponent);
    let negative = e < 0.0;
    let magnitude = e.abs();
    let int_part = magnitude.trunc();
    if int_part > MAX_INTEGER_EXPONENT as f64 {
        return Err(EngineError::numeric_overflow("power", "exponent is too large"));
    }
    let base_f = base.to_double()?;
    let frac = base_f.powf(magnitude.fract());
    if frac.is_nan() && !base_f.is_nan() {
        // a negative base with a fractional exponent has no real result
        return Ok(Value::Null(TypeTag::Double));
    }
    let mut result = if int_part > 0.0 {
        let exact = integer_power(base, int_part as u64, null_as_zero)?;
        multiply(&exact, &Value::Double(frac), false)?
    } else {
        Value::Double(frac)
    };
    if negative {
        result = divide(&Value::Int(1), &result, false)?;
    }
    Ok(result)
}

fn broadcast_base(base: &Value, exponent: &Value, null_as_zero: bool) -> EngineResult<Value> {
    match base {
        Value::List(items) => {
            let out: EngineResult<Vec<Value>> = items
                .iter()
                .map(|item| power(item, exponent, null_as_zero))
                .collect();
            Ok(Value::List(out?))
        }
        Value::DenseVector(items) => {
            let e = as_double(&resolve_scalar("power", exponent)?);
            Ok(Value::DenseVector(items.iter().map(|&x| x.powf(e)).collect()))
        }
        Value::SparseVector(sv) => {
            let e = as_double(&resolve_scalar("power", exponent)?);
            if e > 0.0 {
                // 0^e stays 0 for positive e, so the pattern is preserved
                Ok(Value::SparseVector(sv.map_values(|x| x.powf(e))))
            } else {
                Ok(Value::DenseVector((0..sv.len()).map(|i| sv.get(i).powf(e)).collect()))
            }
        }
        other => Err(EngineError::type_mismatch(
            "power",
            other.type_name(),
            Some(other.display_snippet()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn test_zero_exponent_is_int_one() {
        assert_eq!(power(&Value::Long(7), &Value::Int(0), false).unwrap(), Value::Int(1));
        assert_eq!(
            power(&Value::Complex(1.0, 1.0), &Value::Int(0), false).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            power(&Value::Double(0.0), &Value::Double(0.0), false).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn test_exponent_one_returns_base() {
        assert_eq!(power(&Value::Int(2), &Value::Int(1), false).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_integer_power_by_squaring() {
        assert_eq!(
            power(&Value::Int(2), &Value::Int(10), false).unwrap(),
            Value::Long(1024)
        );
        assert_eq!(
            power(&Value::Double(3.0), &Value::Long(3), false).unwrap(),
            Value::Double(27.0)
        );
    }

    #[test]
    fn test_integer_power_overflows_to_decimal() {
        let r = power(&Value::Long(10), &Value::Int(19), false).unwrap();
        assert_eq!(
            r,
            Value::Decimal(BigDecimal::from_str("10000000000000000000").unwrap())
        );
    }

    #[test]
    fn test_negative_exponent_inverts() {
        assert_eq!(
            power(&Value::Int(2), &Value::Int(-2), false).unwrap(),
            Value::Double(0.25)
        );
        // zero base inverts into a divide-by-zero null
        assert_eq!(
            power(&Value::Int(0), &Value::Int(-1), false).unwrap(),
            Value::Null(TypeTag::Double)
        );
    }

    #[test]
    fn test_negative_exponent_rejected_for_decimal_base() {
        let d = Value::Decimal(BigDecimal::from_str("2").unwrap());
        assert!(power(&d, &Value::Int(-1), false).is_err());
        assert!(power(&Value::Complex(2.0, 1.0), &Value::Int(-1), false).is_err());
    }

    #[test]
    fn test_fractional_exponent_hybrid() {
        assert_eq!(
            power(&Value::Int(4), &Value::Double(0.5), false).unwrap(),
            Value::Double(2.0)
        );
        match power(&Value::Int(2), &Value::Double(2.5), false).unwrap() {
            Value::Double(x) => assert!((x - 5.656_854_249_492_381).abs() < 1e-9),
            other => panic!("expected double, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_base_fractional_exponent_is_null() {
        assert_eq!(
            power(&Value::Int(-8), &Value::Double(0.5), false).unwrap(),
            Value::Null(TypeTag::Double)
        );
    }

    #[test]
    fn test_complex_base_integer_exponent_only() {
        assert_eq!(
            power(&Value::Complex(0.0, 1.0), &Value::Int(2), false).unwrap(),
            Value::Complex(-1.0, 0.0)
        );
        assert!(power(&Value::Complex(0.0, 1.0), &Value::Double(0.5), false).is_err());
    }

    #[test]
    fn test_null_policy() {
        assert_eq!(
            power(&Value::Long(3), &Value::null(), false).unwrap(),
            Value::Null(TypeTag::Long)
        );
        assert_eq!(power(&Value::Long(3), &Value::null(), true).unwrap(), Value::Int(1));
        assert_eq!(
            power(&Value::null(), &Value::Int(2), true).unwrap(),
            Value::Long(0)
        );
    }

    #[test]
    fn test_base_sequence_broadcasts() {
        let list = Value::List(vec![Value::Int(2), Value::Int(3)]);
        assert_eq!(
            power(&list, &Value::Int(2), false).unwrap(),
            Value::List(vec![Value::Long(4), Value::Long(9)])
        );
        let err = power(&Value::Int(2), &list, false).unwrap_err();
        assert!(err.to_string().contains("scalar"));
    }
}

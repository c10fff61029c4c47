//! Scale-aware rounding: ceil, floor, round (HALF_UP) and truncate
//! (toward zero), preserving the operand's numeric variant.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::rowcore::error::{EngineError, EngineResult};
use crate::rowcore::value::numeric::sniff_number;
use crate::rowcore::value::Value;

#[derive(Debug, Clone, Copy)]
enum Mode {
    Ceil,
    Floor,
    HalfUp,
    Trunc,
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Ceil => "ceil",
            Mode::Floor => "floor",
            Mode::HalfUp => "round",
            Mode::Trunc => "truncate",
        }
    }

    fn rounding(self) -> RoundingMode {
        match self {
            Mode::Ceil => RoundingMode::Ceiling,
            Mode::Floor => RoundingMode::Floor,
            Mode::HalfUp => RoundingMode::HalfUp,
            Mode::Trunc => RoundingMode::Down,
        }
    }
}

/// Rounds up (toward positive infinity) at `scale` fractional digits.
/// A negative scale rounds whole digits: `ceil(1234, -2)` is 1300.
pub fn ceil(value: &Value, scale: i64) -> EngineResult<Value> {
    apply_rounding(Mode::Ceil, value, scale)
}

/// Rounds down (toward negative infinity) at `scale` fractional digits.
pub fn floor(value: &Value, scale: i64) -> EngineResult<Value> {
    apply_rounding(Mode::Floor, value, scale)
}

/// Rounds half away from zero at `scale` fractional digits.
pub fn round(value: &Value, scale: i64) -> EngineResult<Value> {
    apply_rounding(Mode::HalfUp, value, scale)
}

/// Drops digits beyond `scale`, rounding toward zero.
pub fn truncate(value: &Value, scale: i64) -> EngineResult<Value> {
    apply_rounding(Mode::Trunc, value, scale)
}

fn apply_rounding(mode: Mode, value: &Value, scale: i64) -> EngineResult<Value> {
    let operation = mode.name();
    match value {
        Value::Null(tag) => Ok(Value::Null(*tag)),
        v if v.type_tag().is_keyed() => {
            let hint = if v.type_tag() == crate::rowcore::value::TypeTag::Set {
                "apply the operation element-wise over a LIST instead"
            } else {
                "operate on a selected field instead"
            };
            Err(EngineError::type_mismatch_hint(
                operation,
                v.type_name(),
                Some(v.display_snippet()),
                hint,
            ))
        }
        v if v.type_tag().is_temporal() => Err(EngineError::type_mismatch(
            operation,
            v.type_name(),
            Some(v.display_snippet()),
        )),
        Value::List(items) => {
            let out: EngineResult<Vec<Value>> = items
                .iter()
                .map(|item| apply_rounding(mode, item, scale))
                .collect();
            Ok(Value::List(out?))
        }
        Value::DenseVector(items) => Ok(Value::DenseVector(
            items.iter().map(|&x| round_f64(mode, x, scale)).collect(),
        )),
        // zero rounds to zero in every mode, so the pattern is preserved
        Value::SparseVector(sv) => Ok(Value::SparseVector(
            sv.map_values(|x| round_f64(mode, x, scale)),
        )),
        Value::Int(i) => {
            if scale >= 0 {
                Ok(value.clone())
            } else {
                let rounded = round_decimal(mode, &BigDecimal::from(*i), scale);
                Ok(match rounded.to_i32() {
                    Some(v) => Value::Int(v),
                    None => Value::Long(rounded.to_i64().unwrap_or_default()),
                })
            }
        }
        Value::Long(l) => {
            if scale >= 0 {
                Ok(value.clone())
            } else {
                let rounded = round_decimal(mode, &BigDecimal::from(*l), scale);
                Ok(match rounded.to_i64() {
                    Some(v) => Value::Long(v),
                    None => Value::Decimal(rounded),
                })
            }
        }
        Value::Boolean(b) => apply_rounding(mode, &Value::Long(*b as i64), scale),
        Value::Float(x) => Ok(Value::Float(round_f32(mode, *x, scale))),
        Value::Double(x) => Ok(Value::Double(round_f64(mode, *x, scale))),
        Value::Numeric(x) => Ok(Value::Numeric(round_f64(mode, *x, scale))),
        Value::Decimal(d) => Ok(Value::Decimal(round_decimal(mode, d, scale))),
        Value::Complex(re, im) => Ok(Value::Complex(
            round_f64(mode, *re, scale),
            round_f64(mode, *im, scale),
        )),
        Value::String(s) => apply_rounding(mode, &sniff_number(s)?, scale),
        Value::Binary(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => apply_rounding(mode, &sniff_number(s)?, scale),
            Err(_) => Err(EngineError::malformed_number("<binary>")),
        },
        other => Err(EngineError::type_mismatch(
            operation,
            other.type_name(),
            Some(other.display_snippet()),
        )),
    }
}

fn round_decimal(mode: Mode, d: &BigDecimal, scale: i64) -> BigDecimal {
    d.with_scale_round(scale, mode.rounding())
}

/// Floats round through their shortest decimal rendering, so 2.345 rounds
/// as the literal 2.345 and not as its exact binary expansion.
fn round_f64(mode: Mode, x: f64, scale: i64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let d = canonical_decimal(&x.to_string()).or_else(|| BigDecimal::from_f64(x));
    match d {
        Some(d) => round_decimal(mode, &d, scale).to_f64().unwrap_or(x),
        None => x,
    }
}

fn round_f32(mode: Mode, x: f32, scale: i64) -> f32 {
    if !x.is_finite() {
        return x;
    }
    let d = canonical_decimal(&x.to_string()).or_else(|| BigDecimal::from_f32(x));
    match d {
        Some(d) => round_decimal(mode, &d, scale).to_f32().unwrap_or(x),
        None => x,
    }
}

fn canonical_decimal(s: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rowcore::value::TypeTag;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn big(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_up_at_scale() {
        assert_eq!(round(&Value::Double(2.345), 2).unwrap(), Value::Double(2.35));
        assert_eq!(round(&Value::Double(-2.345), 2).unwrap(), Value::Double(-2.35));
        assert_eq!(round(&Value::Double(2.344), 2).unwrap(), Value::Double(2.34));
    }

    #[test]
    fn test_ceil_and_floor() {
        assert_eq!(ceil(&Value::Double(2.001), 0).unwrap(), Value::Double(3.0));
        assert_eq!(floor(&Value::Double(2.999), 0).unwrap(), Value::Double(2.0));
        assert_eq!(floor(&Value::Double(-2.001), 0).unwrap(), Value::Double(-3.0));
        assert_eq!(ceil(&Value::Double(2.341), 2).unwrap(), Value::Double(2.35));
    }

    #[test]
    fn test_truncate_goes_toward_zero() {
        assert_eq!(truncate(&Value::Double(2.349), 2).unwrap(), Value::Double(2.34));
        assert_eq!(truncate(&Value::Double(-2.349), 2).unwrap(), Value::Double(-2.34));
    }

    #[test]
    fn test_negative_scale_rounds_whole_digits() {
        assert_eq!(round(&Value::Long(1250), -2).unwrap(), Value::Long(1300));
        assert_eq!(truncate(&Value::Long(1299), -2).unwrap(), Value::Long(1200));
        assert_eq!(ceil(&Value::Int(1201), -2).unwrap(), Value::Int(1300));
        // integral operands are already exact at non-negative scales
        assert_eq!(round(&Value::Long(42), 3).unwrap(), Value::Long(42));
    }

    #[test]
    fn test_int_widens_when_rounding_overflows() {
        let r = ceil(&Value::Int(i32::MAX), -1).unwrap();
        assert_eq!(r, Value::Long(2_147_483_650));
    }

    #[test]
    fn test_decimal_keeps_decimal() {
        assert_eq!(
            round(&Value::Decimal(big("2.345")), 2).unwrap(),
            Value::Decimal(big("2.35"))
        );
        assert_eq!(
            floor(&Value::Decimal(big("-2.001")), 0).unwrap(),
            Value::Decimal(big("-3"))
        );
    }

    #[test]
    fn test_non_finite_passes_through() {
        assert_eq!(
            round(&Value::Double(f64::INFINITY), 2).unwrap(),
            Value::Double(f64::INFINITY)
        );
        match round(&Value::Double(f64::NAN), 2).unwrap() {
            Value::Double(x) => assert!(x.is_nan()),
            other => panic!("expected NaN, got {:?}", other),
        }
    }

    #[test]
    fn test_complex_rounds_both_parts() {
        assert_eq!(
            round(&Value::Complex(1.25, -1.25), 1).unwrap(),
            Value::Complex(1.3, -1.3)
        );
    }

    #[test]
    fn test_null_and_errors() {
        assert_eq!(
            round(&Value::Null(TypeTag::Decimal), 2).unwrap(),
            Value::Null(TypeTag::Decimal)
        );
        assert!(round(&Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 0).is_err());
        assert!(round(&Value::set_of(vec![Value::Int(1)]), 0).is_err());
    }

    #[test]
    fn test_sequences_recurse() {
        let list = Value::List(vec![Value::Double(1.15), Value::Long(7)]);
        assert_eq!(
            round(&list, 1).unwrap(),
            Value::List(vec![Value::Double(1.2), Value::Long(7)])
        );
    }
}

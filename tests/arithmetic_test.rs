//! Scalar arithmetic semantics: widening, overflow fallback, decimal
//! precision, temporal math, power, unary functions, and rounding.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveTime};
use num_traits::FromPrimitive;
use rowcore::{arith, Record, TypeTag, Value};

fn dec(s: &str) -> Value {
    Value::Decimal(BigDecimal::from_str(s).unwrap())
}

#[test]
fn test_widening_ladder() {
    // integral stays integral, floating wins over integral, decimal over
    // floating, complex over everything
    assert_eq!(
        arith::add(&Value::Int(1), &Value::Int(1), false).unwrap(),
        Value::Long(2)
    );
    assert_eq!(
        arith::add(&Value::Int(1), &Value::Float(0.5), false).unwrap(),
        Value::Double(1.5)
    );
    assert_eq!(
        arith::add(&dec("1.5"), &Value::Double(0.25), false).unwrap(),
        dec("1.75")
    );
    assert_eq!(
        arith::add(&Value::Complex(1.0, 2.0), &Value::Double(0.5), false).unwrap(),
        Value::Complex(1.5, 2.0)
    );
}

#[test]
fn test_boolean_operands_count_as_integers() {
    assert_eq!(
        arith::add(&Value::Boolean(true), &Value::Int(2), false).unwrap(),
        Value::Long(3)
    );
    assert_eq!(
        arith::multiply(&Value::Boolean(false), &Value::Long(9), false).unwrap(),
        Value::Long(0)
    );
}

#[test]
fn test_long_overflow_falls_back_to_decimal() {
    assert_eq!(
        arith::add(&Value::Long(i64::MAX), &Value::Long(1), false).unwrap(),
        dec("9223372036854775808")
    );
    assert_eq!(
        arith::subtract(&Value::Long(i64::MIN), &Value::Long(1), false).unwrap(),
        dec("-9223372036854775809")
    );
    let r = arith::multiply(&Value::Long(i64::MAX), &Value::Long(2), false).unwrap();
    assert_eq!(r, dec("18446744073709551614"));
}

#[test]
fn test_double_overflow_recomputes_in_decimal() {
    let r = arith::multiply(&Value::Double(1e308), &Value::Double(10.0), false).unwrap();
    let expected = BigDecimal::from_f64(1e308).unwrap() * BigDecimal::from(10);
    assert_eq!(r, Value::Decimal(expected));

    // ordinary double math stays in doubles
    assert_eq!(
        arith::multiply(&Value::Double(1.5), &Value::Double(2.0), false).unwrap(),
        Value::Double(3.0)
    );
}

#[test]
fn test_decimal_division_precision() {
    let r = arith::divide(&dec("1"), &dec("3"), false).unwrap();
    let expected = format!("0.{}", "3".repeat(128));
    assert_eq!(r, dec(&expected));

    // the final digit rounds half-up
    let r = arith::divide(&dec("2"), &dec("3"), false).unwrap();
    match r {
        Value::Decimal(d) => assert!(d.to_string().ends_with('7')),
        other => panic!("expected decimal, got {other:?}"),
    }

    // exact quotients come out exact
    assert_eq!(arith::divide(&dec("5"), &dec("4"), false).unwrap(), dec("1.25"));
}

#[test]
fn test_remainder_keeps_dividend_sign() {
    assert_eq!(
        arith::remainder(&Value::Int(-7), &Value::Int(3), false).unwrap(),
        Value::Long(-1)
    );
    assert_eq!(
        arith::remainder(&Value::Double(7.5), &Value::Int(2), false).unwrap(),
        Value::Double(1.5)
    );
    let r = arith::remainder(&dec("-7.5"), &dec("2"), false).unwrap();
    assert_eq!(r, dec("-1.5"));
}

#[test]
fn test_divide_and_remainder_by_zero_yield_typed_null() {
    assert_eq!(
        arith::divide(&Value::Int(5), &Value::Int(0), false).unwrap(),
        Value::Null(TypeTag::Double)
    );
    assert_eq!(
        arith::remainder(&Value::Long(5), &Value::Long(0), false).unwrap(),
        Value::Null(TypeTag::Long)
    );
    assert_eq!(
        arith::divide(&dec("5"), &dec("0"), false).unwrap(),
        Value::Null(TypeTag::Decimal)
    );
}

#[test]
fn test_null_policy() {
    // propagation carries the promoted tag
    assert_eq!(
        arith::add(&Value::null(), &Value::Double(1.0), false).unwrap(),
        Value::Null(TypeTag::Double)
    );
    // substitution treats the null side as zero
    assert_eq!(
        arith::subtract(&Value::null(), &Value::Int(5), true).unwrap(),
        Value::Long(-5)
    );
    assert_eq!(
        arith::add(&Value::Int(5), &Value::Null(TypeTag::Decimal), true).unwrap(),
        Value::Long(5)
    );
    // a null divisor stays null even under substitution
    assert_eq!(
        arith::divide(&Value::Int(5), &Value::null(), true).unwrap(),
        Value::Null(TypeTag::Double)
    );
}

#[test]
fn test_string_operands_sniff_their_numeric_form() {
    assert_eq!(
        arith::add(&Value::String(" 2 ".into()), &Value::String("3".into()), false).unwrap(),
        Value::Long(5)
    );
    assert_eq!(
        arith::divide(&Value::String("1".into()), &Value::String("2".into()), false).unwrap(),
        Value::Double(0.5)
    );
    assert_eq!(
        arith::add(&Value::String("1+2i".into()), &Value::Int(1), false).unwrap(),
        Value::Complex(2.0, 2.0)
    );
    assert!(arith::add(&Value::String("widget".into()), &Value::Int(1), false).is_err());
}

#[test]
fn test_temporal_offsets_rewrap() {
    let date = Value::Date(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());
    let two_days = Value::Long(2 * 86_400_000);
    assert_eq!(
        arith::add(&date, &two_days, false).unwrap(),
        Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );

    let t = Value::Time(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    assert_eq!(
        arith::add(&t, &Value::Long(90_000), false).unwrap(),
        Value::Time(NaiveTime::from_hms_milli_opt(12, 1, 30, 0).unwrap())
    );

    // difference of two temporals is a plain duration
    let a = Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(
        arith::subtract(&a, &date, false).unwrap(),
        Value::Long(2 * 86_400_000)
    );

    // the numeric variants skip the rewrap entirely
    assert_eq!(
        arith::add_numeric(&date, &Value::Long(1_000), false).unwrap(),
        Value::Long(date_millis(2024, 2, 28) + 1_000)
    );
}

fn date_millis(y: i32, m: u32, d: u32) -> i64 {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
        .num_milliseconds()
}

#[test]
fn test_power_essentials() {
    // zero exponent wins over every base, complex included
    assert_eq!(
        arith::power(&Value::Complex(1.0, 1.0), &Value::Int(0), false).unwrap(),
        Value::Int(1)
    );
    assert_eq!(
        arith::power(&Value::Int(2), &Value::Int(10), false).unwrap(),
        Value::Long(1024)
    );
    assert_eq!(
        arith::power(&Value::Int(10), &Value::Int(19), false).unwrap(),
        dec("10000000000000000000")
    );
    // negative exponents invert
    assert_eq!(
        arith::power(&Value::Int(2), &Value::Int(-2), false).unwrap(),
        Value::Double(0.25)
    );
    // fractional exponents take the float path
    assert_eq!(
        arith::power(&Value::Int(4), &Value::Double(0.5), false).unwrap(),
        Value::Double(2.0)
    );
    // domain violations are nulls, not errors
    assert_eq!(
        arith::power(&Value::Int(-8), &Value::Double(0.5), false).unwrap(),
        Value::Null(TypeTag::Double)
    );
    // complex bases square through complex multiply
    assert_eq!(
        arith::power(&Value::Complex(0.0, 1.0), &Value::Int(2), false).unwrap(),
        Value::Complex(-1.0, 0.0)
    );
}

#[test]
fn test_unary_functions() {
    assert_eq!(arith::abs(&Value::Int(-3)).unwrap(), Value::Int(3));
    assert_eq!(
        arith::abs(&Value::Int(i32::MIN)).unwrap(),
        Value::Long(-(i32::MIN as i64))
    );
    assert_eq!(arith::negate(&dec("1.5")).unwrap(), dec("-1.5"));
    assert_eq!(arith::abs(&Value::Complex(3.0, 4.0)).unwrap(), Value::Double(5.0));

    assert_eq!(arith::sqrt(&Value::Int(9)).unwrap(), Value::Double(3.0));
    assert_eq!(
        arith::sqrt(&Value::Int(-1)).unwrap(),
        Value::Null(TypeTag::Double)
    );
    assert_eq!(arith::ln(&Value::Int(0)).unwrap(), Value::Null(TypeTag::Double));

    match arith::log(&Value::Int(8), &Value::Int(2)).unwrap() {
        Value::Double(x) => assert!((x - 3.0).abs() < 1e-12),
        other => panic!("expected double, got {other:?}"),
    }

    // strings resolve before the function applies
    assert_eq!(arith::abs(&Value::String("-4".into())).unwrap(), Value::Long(4));
}

#[test]
fn test_asin_border_clamps_rounding_noise() {
    use std::f64::consts::FRAC_PI_2;
    // a hair over 1 from accumulated float error still counts as 1
    match arith::asin(&Value::Double(1.000_000_04), 6).unwrap() {
        Value::Double(x) => assert!((x - FRAC_PI_2).abs() < 1e-12),
        other => panic!("expected double, got {other:?}"),
    }
    // a genuinely out-of-domain operand stays a domain violation
    assert_eq!(
        arith::asin(&Value::Double(1.1), 6).unwrap(),
        Value::Null(TypeTag::Double)
    );
}

#[test]
fn test_rounding_modes() {
    assert_eq!(arith::round(&Value::Double(2.345), 2).unwrap(), Value::Double(2.35));
    assert_eq!(arith::round(&Value::Double(-2.5), 0).unwrap(), Value::Double(-3.0));
    assert_eq!(arith::ceil(&Value::Double(2.1), 0).unwrap(), Value::Double(3.0));
    assert_eq!(arith::floor(&Value::Double(-2.1), 0).unwrap(), Value::Double(-3.0));
    assert_eq!(
        arith::truncate(&Value::Double(-2.7), 0).unwrap(),
        Value::Double(-2.0)
    );

    // negative scale rounds whole digits
    assert_eq!(arith::round(&Value::Long(1250), -2).unwrap(), Value::Long(1300));
    assert_eq!(arith::round(&Value::Int(1249), -2).unwrap(), Value::Int(1200));

    // integrals are already exact at non-negative scales
    assert_eq!(arith::round(&Value::Int(7), 2).unwrap(), Value::Int(7));

    assert_eq!(arith::round(&dec("2.345"), 2).unwrap(), dec("2.35"));
    assert_eq!(
        arith::truncate(&dec("-2.999"), 2).unwrap(),
        dec("-2.99")
    );
}

#[test]
fn test_arithmetic_over_record_fields() {
    let mut row = Record::from_pairs([
        ("qty", Value::Long(3)),
        ("price", Value::Decimal(BigDecimal::from_str("19.99").unwrap())),
    ]);
    let total = arith::multiply(
        row.get("qty").unwrap(),
        row.get("price").unwrap(),
        false,
    )
    .unwrap();
    row.set("total", total);
    assert_eq!(row.get("total"), Some(&dec("59.97")));
}

//! Ordered comparisons: cross-tag numerics, null placement, set
//! quantifiers, and sequence lexicography.

use bigdecimal::BigDecimal;
use rowcore::{arith, Value, ValueMap};

#[test]
fn test_numeric_comparisons_cross_tags() {
    assert!(arith::gt(&Value::Long(5), &Value::Int(3)).unwrap());
    assert!(arith::lt(&Value::Double(2.5), &Value::Long(3)).unwrap());
    assert!(arith::ge(&Value::Int(5), &Value::Double(5.0)).unwrap());
    assert!(arith::le(&Value::Decimal(BigDecimal::from(7)), &Value::Long(7)).unwrap());
    assert!(!arith::gt(&Value::Int(2), &Value::Int(2)).unwrap());
}

#[test]
fn test_null_sorts_below_everything() {
    assert!(arith::lt(&Value::null(), &Value::Int(i32::MIN)).unwrap());
    assert!(arith::gt(&Value::Int(0), &Value::null()).unwrap());
    // two nulls are equal under the total order
    assert!(arith::ge(&Value::null(), &Value::null()).unwrap());
    assert!(arith::le(&Value::null(), &Value::null()).unwrap());
    assert!(!arith::gt(&Value::null(), &Value::null()).unwrap());
}

#[test]
fn test_class_rank_decides_across_kinds() {
    // real numbers sort below strings regardless of magnitude
    assert!(arith::lt(&Value::Int(1_000_000), &Value::String("0".into())).unwrap());
    // strings sort below temporals
    assert!(arith::gt(
        &Value::Date(chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
        &Value::String("zzz".into())
    )
    .unwrap());
}

#[test]
fn test_left_set_is_existential() {
    let s = Value::set_of(vec![Value::Int(1), Value::Int(9)]);
    // one element above the bound is enough
    assert!(arith::gt(&s, &Value::Int(5)).unwrap());
    assert!(!arith::gt(&s, &Value::Int(9)).unwrap());
    assert!(arith::lt(&s, &Value::Int(2)).unwrap());
}

#[test]
fn test_right_set_is_universal() {
    let s = Value::set_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    // the scalar must clear every element
    assert!(arith::gt(&Value::Int(5), &s).unwrap());
    assert!(!arith::gt(&Value::Int(3), &s).unwrap());
    assert!(arith::le(&Value::Int(1), &s).unwrap());
}

#[test]
fn test_set_against_set_combines_quantifiers() {
    let left = Value::set_of(vec![Value::Int(0), Value::Int(10)]);
    let right = Value::set_of(vec![Value::Int(1), Value::Int(2)]);
    // some left element beats every right element
    assert!(arith::gt(&left, &right).unwrap());

    let low = Value::set_of(vec![Value::Int(0), Value::Int(1)]);
    assert!(!arith::gt(&low, &right).unwrap());
}

#[test]
fn test_empty_set_quantifier_edges() {
    let empty = Value::set_of(vec![]);
    // no witness exists on the left
    assert!(!arith::gt(&empty, &Value::Int(0)).unwrap());
    // a universal claim over nothing holds on the right
    assert!(arith::gt(&Value::Int(0), &empty).unwrap());
}

#[test]
fn test_same_content_diverges_between_list_and_set() {
    // the quantifier reading and the lexicographic reading disagree on
    // the same multiset of elements
    let set_a = Value::set_of(vec![Value::Int(0), Value::Int(10)]);
    let set_b = Value::set_of(vec![Value::Int(1), Value::Int(2)]);
    assert!(arith::gt(&set_a, &set_b).unwrap(), "10 beats every right element");

    let list_a = Value::List(vec![Value::Int(0), Value::Int(10)]);
    let list_b = Value::List(vec![Value::Int(1), Value::Int(2)]);
    assert!(!arith::gt(&list_a, &list_b).unwrap(), "first element 0 < 1 decides");
}

#[test]
fn test_equal_sequences_are_not_greater() {
    let a = Value::List(vec![Value::Int(3), Value::Int(1)]);
    let b = Value::List(vec![Value::Int(3), Value::Int(1)]);
    assert!(!arith::gt(&a, &b).unwrap());
    assert!(arith::ge(&a, &b).unwrap());
}

#[test]
fn test_lists_stay_lexicographic() {
    // a LIST comparison is a single ordered comparison, not a quantifier
    let a = Value::List(vec![Value::Int(5), Value::Int(0)]);
    let b = Value::List(vec![Value::Int(1), Value::Int(99)]);
    assert!(arith::gt(&a, &b).unwrap());

    // equal prefix, shorter sorts first
    let short = Value::List(vec![Value::Int(1)]);
    let long = Value::List(vec![Value::Int(1), Value::Int(0)]);
    assert!(arith::lt(&short, &long).unwrap());

    // dense vectors and lists share the sequence order
    let dense = Value::DenseVector(vec![1.0, 2.0]);
    let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
    assert!(arith::ge(&dense, &list).unwrap());
    assert!(arith::le(&dense, &list).unwrap());
}

#[test]
fn test_maps_are_rejected() {
    let mut fields = ValueMap::new();
    fields.put("a", Value::Int(1));
    let m = Value::Map(fields);
    assert!(arith::gt(&m, &Value::Int(1)).is_err());
    assert!(arith::lt(&Value::Int(1), &m).is_err());
}

#[test]
fn test_string_ordering_is_bytewise() {
    assert!(arith::lt(&Value::String("apple".into()), &Value::String("banana".into())).unwrap());
    assert!(arith::gt(&Value::String("b".into()), &Value::String("Z".into())).unwrap());
}

#[test]
fn test_temporal_comparisons_share_the_millis_axis() {
    use chrono::{NaiveDate, NaiveDateTime};
    let date = Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    let ts: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(23, 0, 0)
        .unwrap();
    assert!(arith::gt(&date, &Value::Timestamp(ts)).unwrap());
}

//! Broadcasting arithmetic over lists and vectors: elementwise pairing,
//! scalar application, identity short-circuits, and shape errors.

use rowcore::{arith, SparseVector, TypeTag, Value};

fn list_of_ints(items: &[i32]) -> Value {
    Value::List(items.iter().map(|&i| Value::Int(i)).collect())
}

#[test]
fn test_scalar_over_list() {
    let prices = list_of_ints(&[10, 20, 30]);
    assert_eq!(
        arith::multiply(&prices, &Value::Int(2), false).unwrap(),
        Value::List(vec![Value::Long(20), Value::Long(40), Value::Long(60)])
    );
    // scalar on the left keeps operand order
    assert_eq!(
        arith::subtract(&Value::Int(100), &prices, false).unwrap(),
        Value::List(vec![Value::Long(90), Value::Long(80), Value::Long(70)])
    );
}

#[test]
fn test_identity_short_circuits_return_sequence_unchanged() {
    let v = Value::List(vec![Value::Double(1.5), Value::Int(2)]);
    assert_eq!(arith::add(&v, &Value::Int(0), false).unwrap(), v);
    // the null policy flag has no bearing on the short-circuit
    assert_eq!(arith::add(&v, &Value::Int(0), true).unwrap(), v);
    assert_eq!(arith::add(&Value::Double(0.0), &v, false).unwrap(), v);
    assert_eq!(arith::subtract(&v, &Value::Int(0), false).unwrap(), v);
    assert_eq!(arith::multiply(&v, &Value::Long(1), false).unwrap(), v);
    assert_eq!(arith::divide(&v, &Value::Int(1), false).unwrap(), v);

    // zero on the left of a subtraction is not an identity
    assert_eq!(
        arith::subtract(&Value::Int(0), &list_of_ints(&[1, 2]), false).unwrap(),
        Value::List(vec![Value::Long(-1), Value::Long(-2)])
    );
}

#[test]
fn test_nested_lists_recurse() {
    let nested = Value::List(vec![
        Value::List(vec![Value::Int(1), Value::Int(2)]),
        Value::Int(3),
    ]);
    assert_eq!(
        arith::add(&nested, &Value::Int(10), false).unwrap(),
        Value::List(vec![
            Value::List(vec![Value::Long(11), Value::Long(12)]),
            Value::Long(13),
        ])
    );
}

#[test]
fn test_list_pairs_zip_elementwise() {
    let a = list_of_ints(&[1, 2, 3]);
    let b = Value::List(vec![Value::Int(10), Value::Double(0.5), Value::Int(-3)]);
    assert_eq!(
        arith::add(&a, &b, false).unwrap(),
        Value::List(vec![Value::Long(11), Value::Double(2.5), Value::Long(0)])
    );
}

#[test]
fn test_size_mismatch_reports_both_sizes() {
    let a = list_of_ints(&[1, 2]);
    let b = list_of_ints(&[1, 2, 3]);
    let err = arith::add(&a, &b, false).unwrap_err();
    let message = err.to_string();
    assert!(message.contains('2') && message.contains('3'), "{message}");
}

#[test]
fn test_dense_vectors_compute_in_plain_f64() {
    let a = Value::DenseVector(vec![1.0, 4.0, 9.0]);
    let b = Value::DenseVector(vec![1.0, 2.0, 0.0]);
    // IEEE semantics inside vectors: division by zero is infinity
    assert_eq!(
        arith::divide(&a, &b, false).unwrap(),
        Value::DenseVector(vec![1.0, 2.0, f64::INFINITY])
    );
    assert_eq!(
        arith::add(&a, &Value::Double(0.5), false).unwrap(),
        Value::DenseVector(vec![1.5, 4.5, 9.5])
    );
}

#[test]
fn test_dense_and_list_pair_yields_list() {
    let dense = Value::DenseVector(vec![1.0, 2.0]);
    let list = list_of_ints(&[10, 20]);
    assert_eq!(
        arith::add(&dense, &list, false).unwrap(),
        Value::List(vec![Value::Double(11.0), Value::Double(22.0)])
    );
}

#[test]
fn test_sparse_pattern_preserved_only_when_zeros_stay_zero() {
    let sv = SparseVector::new(6, vec![1, 4], vec![3.0, -6.0]).unwrap();
    let sparse = Value::SparseVector(sv);

    // multiply maps implicit zeros to zero, so the pattern survives
    match arith::multiply(&sparse, &Value::Double(0.5), false).unwrap() {
        Value::SparseVector(out) => {
            assert_eq!(out.stored_len(), 2);
            assert_eq!(out.get(1), 1.5);
            assert_eq!(out.get(4), -3.0);
        }
        other => panic!("expected sparse, got {other:?}"),
    }

    // subtract moves the zeros, so the result densifies
    assert_eq!(
        arith::subtract(&sparse, &Value::Int(1), false).unwrap(),
        Value::DenseVector(vec![-1.0, 2.0, -1.0, -1.0, -7.0, -1.0])
    );

    // dividing the scalar BY the vector hits the implicit zeros too
    match arith::divide(&Value::Int(1), &sparse, false).unwrap() {
        Value::DenseVector(out) => {
            assert_eq!(out[1], 1.0 / 3.0);
            assert!(out[0].is_infinite());
        }
        other => panic!("expected dense, got {other:?}"),
    }
}

#[test]
fn test_complex_scalar_over_vector_yields_list() {
    let dense = Value::DenseVector(vec![1.0, 2.0]);
    let r = arith::add(&dense, &Value::Complex(0.0, 1.0), false).unwrap();
    assert_eq!(
        r,
        Value::List(vec![Value::Complex(1.0, 1.0), Value::Complex(2.0, 1.0)])
    );
}

#[test]
fn test_null_elements_follow_the_null_policy() {
    let v = Value::List(vec![Value::Int(1), Value::null()]);
    assert_eq!(
        arith::add(&v, &Value::Int(5), false).unwrap(),
        Value::List(vec![Value::Long(6), Value::Null(TypeTag::Long)])
    );
    assert_eq!(
        arith::add(&v, &Value::Int(5), true).unwrap(),
        Value::List(vec![Value::Long(6), Value::Long(5)])
    );
}

#[test]
fn test_string_elements_resolve_inside_sequences() {
    let v = Value::List(vec![Value::String("2".into()), Value::String("1.5".into())]);
    assert_eq!(
        arith::multiply(&v, &Value::Int(2), false).unwrap(),
        Value::List(vec![Value::Long(4), Value::Double(3.0)])
    );
}

#[test]
fn test_power_broadcasts_over_base_only() {
    let bases = list_of_ints(&[2, 3]);
    assert_eq!(
        arith::power(&bases, &Value::Int(2), false).unwrap(),
        Value::List(vec![Value::Long(4), Value::Long(9)])
    );
    // a sequence exponent has no elementwise meaning
    assert!(arith::power(&Value::Int(2), &bases, false).is_err());
}

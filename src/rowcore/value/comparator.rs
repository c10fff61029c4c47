//! Cross-type total order, coercive equality, and canonical hashing.
//!
//! Heterogeneous columns sort by class first (nulls lowest, then real
//! numbers, complex, strings, binaries, temporals, sequences, sets, maps);
//! within the real-number class, values of different tags compare by
//! numeric value, exactly when a decimal is involved. Hashing is canonical:
//! values that compare equal hash equal regardless of tag.

use std::cmp::Ordering;

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::rowcore::record::ordered_map::string_hash;
use crate::rowcore::value::types::{
    date_to_millis, datetime_to_millis, time_to_millis, Value,
};

const RANK_REAL: u8 = 1;
const RANK_COMPLEX: u8 = 2;
const RANK_STRING: u8 = 3;
const RANK_BINARY: u8 = 4;
const RANK_TEMPORAL: u8 = 5;
const RANK_SEQUENCE: u8 = 6;
const RANK_SET: u8 = 7;
const RANK_MAP: u8 = 8;

// exact 2^63 as f64; floats with fract 0 inside (-2^63, 2^63) cast to i64
// without loss
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// Comparison and hashing utilities over [`Value`].
pub struct ValueComparator;

enum RealView {
    Int(i64),
    Float(f64),
    Big(BigDecimal),
}

impl ValueComparator {
    /// Total-order comparison between any two values.
    pub fn compare(left: &Value, right: &Value) -> Ordering {
        match (left.is_null(), right.is_null()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        let left_rank = Self::class_rank(left);
        let right_rank = Self::class_rank(right);
        if left_rank != right_rank {
            return left_rank.cmp(&right_rank);
        }
        match (left, right) {
            (Value::Complex(ar, ai), Value::Complex(br, bi)) => {
                ar.total_cmp(br).then(ai.total_cmp(bi))
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Binary(a), Value::Binary(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => Self::compare_sorted_contents(a, b),
            (Value::Map(a), Value::Map(b)) => {
                let mut left_pairs: Vec<(&str, &Value)> = a.iter().collect();
                let mut right_pairs: Vec<(&str, &Value)> = b.iter().collect();
                left_pairs.sort_by(|x, y| x.0.cmp(y.0));
                right_pairs.sort_by(|x, y| x.0.cmp(y.0));
                for ((ak, av), (bk, bv)) in left_pairs.iter().zip(right_pairs.iter()) {
                    let key_ord = ak.cmp(bk);
                    if key_ord != Ordering::Equal {
                        return key_ord;
                    }
                    let value_ord = Self::compare(av, bv);
                    if value_ord != Ordering::Equal {
                        return value_ord;
                    }
                }
                left_pairs.len().cmp(&right_pairs.len())
            }
            _ => match left_rank {
                RANK_REAL => Self::compare_real(left, right),
                RANK_TEMPORAL => Self::compare_temporal(left, right),
                _ => Self::compare_elementwise(left, right),
            },
        }
    }

    /// Equality under the total order.
    pub fn values_equal(left: &Value, right: &Value) -> bool {
        Self::compare(left, right) == Ordering::Equal
    }

    /// Lexicographic comparison of two sequence values element by element;
    /// exhaustion decides by length.
    pub fn compare_elementwise(left: &Value, right: &Value) -> Ordering {
        let mut left_iter = left.elements();
        let mut right_iter = right.elements();
        loop {
            match (left_iter.next(), right_iter.next()) {
                (Some(a), Some(b)) => {
                    let ord = Self::compare(&a, &b);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (None, None) => return Ordering::Equal,
            }
        }
    }

    /// Lexicographic comparison of two value slices.
    pub fn compare_slices(left: &[Value], right: &[Value]) -> Ordering {
        for (a, b) in left.iter().zip(right.iter()) {
            let ord = Self::compare(a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        left.len().cmp(&right.len())
    }

    // Sets compare by sorted content, so insertion order never matters.
    fn compare_sorted_contents(left: &[Value], right: &[Value]) -> Ordering {
        let mut a = left.to_vec();
        let mut b = right.to_vec();
        a.sort();
        b.sort();
        Self::compare_slices(&a, &b)
    }

    fn class_rank(value: &Value) -> u8 {
        match value {
            Value::Null(_) => 0,
            Value::Int(_)
            | Value::Long(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::Numeric(_)
            | Value::Decimal(_)
            | Value::Boolean(_) => RANK_REAL,
            Value::Complex(..) => RANK_COMPLEX,
            Value::String(_) => RANK_STRING,
            Value::Binary(_) => RANK_BINARY,
            Value::Date(_)
            | Value::Time(_)
            | Value::Timestamp(_)
            | Value::CalendarTime(_)
            | Value::CalendarTimestamp(_)
            | Value::Instant(_) => RANK_TEMPORAL,
            Value::List(_) | Value::DenseVector(_) | Value::SparseVector(_) => RANK_SEQUENCE,
            Value::Set(_) => RANK_SET,
            Value::Map(_) => RANK_MAP,
        }
    }

    fn real_view(value: &Value) -> Option<RealView> {
        match value {
            Value::Int(i) => Some(RealView::Int(*i as i64)),
            Value::Long(l) => Some(RealView::Int(*l)),
            Value::Boolean(b) => Some(RealView::Int(*b as i64)),
            Value::Float(x) => Some(RealView::Float(*x as f64)),
            Value::Double(x) | Value::Numeric(x) => Some(RealView::Float(*x)),
            Value::Decimal(d) => Some(RealView::Big(d.clone())),
            _ => None,
        }
    }

    fn compare_real(left: &Value, right: &Value) -> Ordering {
        match (Self::real_view(left), Self::real_view(right)) {
            (Some(a), Some(b)) => Self::cmp_real(a, b),
            _ => Ordering::Equal,
        }
    }

    fn cmp_real(a: RealView, b: RealView) -> Ordering {
        use RealView::*;
        match (a, b) {
            (Int(x), Int(y)) => x.cmp(&y),
            (Float(x), Float(y)) => x.total_cmp(&y),
            (Int(x), Float(y)) => (x as f64).total_cmp(&y),
            (Float(x), Int(y)) => x.total_cmp(&(y as f64)),
            (Big(x), Big(y)) => x.cmp(&y),
            (Big(x), Int(y)) => x.cmp(&BigDecimal::from(y)),
            (Int(x), Big(y)) => BigDecimal::from(x).cmp(&y),
            (Big(x), Float(y)) => Self::cmp_big_float(&x, y),
            (Float(x), Big(y)) => Self::cmp_big_float(&y, x).reverse(),
        }
    }

    // non-finite floats sort above every decimal except -inf, which sorts
    // below; finite floats convert exactly
    fn cmp_big_float(big: &BigDecimal, float: f64) -> Ordering {
        if float.is_nan() || float == f64::INFINITY {
            Ordering::Less
        } else if float == f64::NEG_INFINITY {
            Ordering::Greater
        } else {
            match BigDecimal::from_f64(float) {
                Some(fd) => big.cmp(&fd),
                None => Ordering::Less,
            }
        }
    }

    fn temporal_millis(value: &Value) -> Option<BigDecimal> {
        match value {
            Value::Date(d) => Some(BigDecimal::from(date_to_millis(*d))),
            Value::Time(t) | Value::CalendarTime(t) => Some(BigDecimal::from(time_to_millis(*t))),
            Value::Timestamp(ts) | Value::CalendarTimestamp(ts) => {
                Some(BigDecimal::from(datetime_to_millis(*ts)))
            }
            Value::Instant(d) => Some(d.clone()),
            _ => None,
        }
    }

    fn compare_temporal(left: &Value, right: &Value) -> Ordering {
        match (Self::temporal_millis(left), Self::temporal_millis(right)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => Ordering::Equal,
        }
    }

    /// Canonical i32 hash, consistent with [`ValueComparator::compare`]
    /// equality: numerically equal reals hash equal whatever their tag,
    /// and sets/maps hash order-independently.
    pub fn hash_code(value: &Value) -> i32 {
        match value {
            Value::Null(_) => 0,
            Value::Int(_)
            | Value::Long(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::Numeric(_)
            | Value::Decimal(_)
            | Value::Boolean(_) => Self::real_hash(value),
            Value::Complex(re, im) => Self::f64_hash(*re)
                .wrapping_mul(109)
                .wrapping_add(Self::f64_hash(*im)),
            Value::String(s) => string_hash(s),
            Value::Binary(bytes) => bytes
                .iter()
                .fold(0i32, |h, b| h.wrapping_mul(109).wrapping_add(*b as i32)),
            Value::Date(_)
            | Value::Time(_)
            | Value::Timestamp(_)
            | Value::CalendarTime(_)
            | Value::CalendarTimestamp(_)
            | Value::Instant(_) => match Self::temporal_millis(value) {
                Some(d) => Self::decimal_hash(&d),
                None => 0,
            },
            Value::List(_) | Value::DenseVector(_) | Value::SparseVector(_) => value
                .elements()
                .fold(0i32, |h, v| h.wrapping_mul(109).wrapping_add(Self::hash_code(&v))),
            Value::Set(items) => items
                .iter()
                .fold(0i32, |h, v| h.wrapping_add(Self::hash_code(v))),
            Value::Map(map) => map.iter().fold(0i32, |h, (k, v)| {
                h.wrapping_add(
                    string_hash(k)
                        .wrapping_mul(109)
                        .wrapping_add(Self::hash_code(v)),
                )
            }),
        }
    }

    fn real_hash(value: &Value) -> i32 {
        match Self::real_view(value) {
            Some(RealView::Int(i)) => Self::long_hash(i),
            Some(RealView::Float(x)) => Self::f64_hash(x),
            Some(RealView::Big(d)) => Self::decimal_hash(&d),
            None => 0,
        }
    }

    fn long_hash(v: i64) -> i32 {
        let u = v as u64;
        (u ^ (u >> 32)) as i32
    }

    fn f64_hash(x: f64) -> i32 {
        if x.fract() == 0.0 && x >= -TWO_POW_63 && x < TWO_POW_63 {
            Self::long_hash(x as i64)
        } else {
            Self::long_hash(x.to_bits() as i64)
        }
    }

    fn decimal_hash(d: &BigDecimal) -> i32 {
        let truncated = d.with_scale_round(0, RoundingMode::Down);
        if truncated == *d {
            if let Some(i) = truncated.to_i64() {
                return Self::long_hash(i);
            }
        }
        match d.to_f64() {
            Some(x) => Self::long_hash(x.to_bits() as i64),
            None => 0,
        }
    }
}

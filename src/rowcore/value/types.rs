//! Core value type for the row model.
//!
//! `Value` is the dynamically tagged value every row field, key element, and
//! arithmetic operand flows through. Nulls are typed: `Value::Null(tag)`
//! remembers the type a non-null result would have had, so downstream
//! consumers can still reason about column types after a null-producing
//! operation.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::rowcore::error::{EngineError, EngineResult};
use crate::rowcore::record::ValueMap;
use crate::rowcore::value::numeric;
use crate::rowcore::value::tag::TypeTag;
use crate::rowcore::value::ValueComparator;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Fixed-length vector that stores only its non-zero entries.
///
/// Indices are kept sorted and unique; positions without a stored entry
/// read as 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    len: usize,
    indices: Vec<u32>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Builds a sparse vector from parallel index/value arrays.
    ///
    /// The arrays must be the same length. Entries are normalized: sorted
    /// by index, later duplicates win, and indices at or beyond `len` are
    /// dropped.
    pub fn new(len: usize, indices: Vec<u32>, values: Vec<f64>) -> EngineResult<SparseVector> {
        if indices.len() != values.len() {
            return Err(EngineError::size_mismatch(
                "sparse_vector",
                indices.len(),
                values.len(),
            ));
        }
        let mut pairs: Vec<(u32, f64)> = indices
            .into_iter()
            .zip(values)
            .filter(|(i, _)| (*i as usize) < len)
            .collect();
        pairs.sort_by_key(|(i, _)| *i);
        let mut indices = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            if indices.last() == Some(&i) {
                *values.last_mut().unwrap() = v;
            } else {
                indices.push(i);
                values.push(v);
            }
        }
        Ok(SparseVector {
            len,
            indices,
            values,
        })
    }

    /// Logical length of the vector.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored (explicit) entries.
    pub fn stored_len(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at logical position `i`; unset positions read as 0.0.
    pub fn get(&self, i: usize) -> f64 {
        match self.indices.binary_search(&(i as u32)) {
            Ok(slot) => self.values[slot],
            Err(_) => 0.0,
        }
    }

    /// Iterates the stored entries as `(index, value)` pairs.
    pub fn iter_stored(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Maps the stored values through `f`, keeping the sparsity pattern.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> SparseVector {
        SparseVector {
            len: self.len,
            indices: self.indices.clone(),
            values: self.values.iter().map(|v| f(*v)).collect(),
        }
    }
}

/// A dynamically tagged value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null carrying the natural type of the value it stands in for
    Null(TypeTag),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// General-purpose numeric, f64-backed
    Numeric(f64),
    Decimal(BigDecimal),
    /// Complex number: real and imaginary parts
    Complex(f64, f64),
    Boolean(bool),
    String(String),
    Binary(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    CalendarTime(NaiveTime),
    CalendarTimestamp(NaiveDateTime),
    /// Decimal epoch milliseconds
    Instant(BigDecimal),
    List(Vec<Value>),
    /// Insertion-ordered set of distinct values
    Set(Vec<Value>),
    /// Keyed values in insertion order, backed by the same ordered
    /// container rows use
    Map(ValueMap),
    DenseVector(Vec<f64>),
    SparseVector(SparseVector),
}

impl Value {
    /// The plain untyped null.
    pub fn null() -> Value {
        Value::Null(TypeTag::Null)
    }

    /// A typed null carrying the natural type of the missing value.
    pub fn null_of(tag: TypeTag) -> Value {
        Value::Null(tag)
    }

    /// Builds a SET value, keeping the first occurrence of each distinct
    /// element in insertion order.
    pub fn set_of(values: Vec<Value>) -> Value {
        let mut distinct: Vec<Value> = Vec::with_capacity(values.len());
        for v in values {
            if !distinct.contains(&v) {
                distinct.push(v);
            }
        }
        Value::Set(distinct)
    }

    /// Runtime type tag. Typed nulls report `TypeTag::Null`; use
    /// [`Value::natural_tag`] for the carried type.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null(_) => TypeTag::Null,
            Value::Int(_) => TypeTag::Int,
            Value::Long(_) => TypeTag::Long,
            Value::Float(_) => TypeTag::Float,
            Value::Double(_) => TypeTag::Double,
            Value::Numeric(_) => TypeTag::Numeric,
            Value::Decimal(_) => TypeTag::Decimal,
            Value::Complex(..) => TypeTag::Complex,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::String(_) => TypeTag::String,
            Value::Binary(_) => TypeTag::Binary,
            Value::Date(_) => TypeTag::Date,
            Value::Time(_) => TypeTag::Time,
            Value::Timestamp(_) => TypeTag::Timestamp,
            Value::CalendarTime(_) => TypeTag::CalendarTime,
            Value::CalendarTimestamp(_) => TypeTag::CalendarTimestamp,
            Value::Instant(_) => TypeTag::Instant,
            Value::List(_) => TypeTag::List,
            Value::Set(_) => TypeTag::Set,
            Value::Map(_) => TypeTag::Map,
            Value::DenseVector(_) => TypeTag::DenseVector,
            Value::SparseVector(_) => TypeTag::SparseVector,
        }
    }

    /// The tag arithmetic reasons about: the carried tag for typed nulls,
    /// the runtime tag otherwise.
    pub fn natural_tag(&self) -> TypeTag {
        match self {
            Value::Null(tag) => *tag,
            other => other.type_tag(),
        }
    }

    /// Display name of the runtime type, for error messages.
    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    /// True for nulls, empty strings/binaries, and empty collections.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null(_) => true,
            Value::String(s) => s.is_empty(),
            Value::Binary(b) => b.is_empty(),
            Value::List(items) | Value::Set(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::DenseVector(xs) => xs.is_empty(),
            Value::SparseVector(sv) => sv.is_empty(),
            _ => false,
        }
    }

    /// True for values that are numbers, and for string/binary literals
    /// that sniff as numbers.
    pub fn is_number(&self) -> bool {
        match self {
            Value::Int(_)
            | Value::Long(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::Numeric(_)
            | Value::Decimal(_)
            | Value::Complex(..) => true,
            Value::String(s) => {
                numeric::is_number(s) || numeric::is_digits(s) || numeric::is_complex_literal(s)
            }
            Value::Binary(b) => match std::str::from_utf8(b) {
                Ok(s) => {
                    numeric::is_number(s) || numeric::is_digits(s) || numeric::is_complex_literal(s)
                }
                Err(_) => false,
            },
            _ => false,
        }
    }

    /// True for integer values and for string/binary literals that are
    /// pure digit runs.
    pub fn is_digits(&self) -> bool {
        match self {
            Value::Int(_) | Value::Long(_) => true,
            Value::String(s) => numeric::is_digits(s),
            Value::Binary(b) => match std::str::from_utf8(b) {
                Ok(s) => numeric::is_digits(s),
                Err(_) => false,
            },
            _ => false,
        }
    }

    /// Element count for collections, character count for strings, byte
    /// count for binaries, 0 for nulls, 1 for other scalars.
    pub fn size(&self) -> usize {
        match self {
            Value::Null(_) => 0,
            Value::String(s) => s.chars().count(),
            Value::Binary(b) => b.len(),
            Value::List(items) | Value::Set(items) => items.len(),
            Value::Map(map) => map.len(),
            Value::DenseVector(xs) => xs.len(),
            Value::SparseVector(sv) => sv.len(),
            _ => 1,
        }
    }

    /// Element at position `i` for collections, in insertion order.
    /// Vector elements materialize as DOUBLE; map elements are the values
    /// by ordinal. `None` for scalars and out-of-range positions.
    pub fn get(&self, i: usize) -> Option<Value> {
        match self {
            Value::List(items) | Value::Set(items) => items.get(i).cloned(),
            Value::Map(map) => (i < map.len()).then(|| map.value_at(i).clone()),
            Value::DenseVector(xs) => xs.get(i).map(|x| Value::Double(*x)),
            Value::SparseVector(sv) => (i < sv.len()).then(|| Value::Double(sv.get(i))),
            _ => None,
        }
    }

    /// Iterates the elements of a collection in order; a non-collection
    /// yields itself once, so scalars behave as one-element broadcasts.
    pub fn elements(&self) -> ElementIter<'_> {
        match self {
            Value::List(items) | Value::Set(items) => ElementIter::Slice(items.iter()),
            Value::Map(map) => ElementIter::Slice(map.value_slice().iter()),
            Value::DenseVector(xs) => ElementIter::Dense(xs.iter()),
            Value::SparseVector(sv) => ElementIter::Sparse { vector: sv, index: 0 },
            other => ElementIter::Once(Some(other.clone())),
        }
    }

    /// Converts to i64: integers widen, reals truncate, booleans map to
    /// 0/1, temporals yield their millisecond payload, and strings sniff.
    pub fn to_long(&self) -> EngineResult<i64> {
        match self {
            Value::Int(i) => Ok(*i as i64),
            Value::Long(l) => Ok(*l),
            Value::Boolean(b) => Ok(*b as i64),
            Value::Float(x) => Ok(*x as i64),
            Value::Double(x) | Value::Numeric(x) => Ok(*x as i64),
            Value::Decimal(d) => decimal_to_long("to_long", d),
            Value::Complex(re, im) if *im == 0.0 => Ok(*re as i64),
            Value::Date(d) => Ok(date_to_millis(*d)),
            Value::Time(t) | Value::CalendarTime(t) => Ok(time_to_millis(*t)),
            Value::Timestamp(ts) | Value::CalendarTimestamp(ts) => Ok(datetime_to_millis(*ts)),
            Value::Instant(d) => decimal_to_long("to_long", d),
            Value::String(s) => numeric::sniff_number(s)?.to_long(),
            Value::Binary(b) => sniff_binary(b)?.to_long(),
            other => Err(conversion_error("to_long", other)),
        }
    }

    /// Converts to f64, the floating-space view of the value.
    pub fn to_double(&self) -> EngineResult<f64> {
        match self {
            Value::Int(i) => Ok(*i as f64),
            Value::Long(l) => Ok(*l as f64),
            Value::Boolean(b) => Ok(*b as i64 as f64),
            Value::Float(x) => Ok(*x as f64),
            Value::Double(x) | Value::Numeric(x) => Ok(*x),
            Value::Decimal(d) => d
                .to_f64()
                .ok_or_else(|| EngineError::numeric_overflow("to_double", "DECIMAL is not representable")),
            Value::Complex(re, im) if *im == 0.0 => Ok(*re),
            Value::Date(d) => Ok(date_to_millis(*d) as f64),
            Value::Time(t) | Value::CalendarTime(t) => Ok(time_to_millis(*t) as f64),
            Value::Timestamp(ts) | Value::CalendarTimestamp(ts) => {
                Ok(datetime_to_millis(*ts) as f64)
            }
            Value::Instant(d) => d
                .to_f64()
                .ok_or_else(|| EngineError::numeric_overflow("to_double", "INSTANT is not representable")),
            Value::String(s) => numeric::sniff_number(s)?.to_double(),
            Value::Binary(b) => sniff_binary(b)?.to_double(),
            other => Err(conversion_error("to_double", other)),
        }
    }

    /// Converts to arbitrary-precision decimal.
    pub fn to_decimal(&self) -> EngineResult<BigDecimal> {
        match self {
            Value::Int(i) => Ok(BigDecimal::from(*i)),
            Value::Long(l) => Ok(BigDecimal::from(*l)),
            Value::Boolean(b) => Ok(BigDecimal::from(*b as i64)),
            Value::Float(x) => float_to_decimal("to_decimal", *x as f64),
            Value::Double(x) | Value::Numeric(x) => float_to_decimal("to_decimal", *x),
            Value::Decimal(d) => Ok(d.clone()),
            Value::Complex(re, im) if *im == 0.0 => float_to_decimal("to_decimal", *re),
            Value::Date(d) => Ok(BigDecimal::from(date_to_millis(*d))),
            Value::Time(t) | Value::CalendarTime(t) => Ok(BigDecimal::from(time_to_millis(*t))),
            Value::Timestamp(ts) | Value::CalendarTimestamp(ts) => {
                Ok(BigDecimal::from(datetime_to_millis(*ts)))
            }
            Value::Instant(d) => Ok(d.clone()),
            Value::String(s) => numeric::sniff_number(s)?.to_decimal(),
            Value::Binary(b) => sniff_binary(b)?.to_decimal(),
            other => Err(conversion_error("to_decimal", other)),
        }
    }

    /// Converts to boolean: booleans pass through, numbers test non-zero,
    /// strings accept true/false/1/0 (case-insensitive).
    pub fn to_boolean(&self) -> EngineResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::Long(l) => Ok(*l != 0),
            Value::Float(x) => Ok(*x != 0.0),
            Value::Double(x) | Value::Numeric(x) => Ok(*x != 0.0),
            Value::Decimal(d) => Ok(!d.is_zero()),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(conversion_error("to_boolean", self)),
            },
            other => Err(conversion_error("to_boolean", other)),
        }
    }

    /// Converts to the INSTANT payload: decimal epoch milliseconds.
    pub fn to_instant(&self) -> EngineResult<BigDecimal> {
        match self {
            Value::Instant(d) => Ok(d.clone()),
            Value::Date(_)
            | Value::Time(_)
            | Value::Timestamp(_)
            | Value::CalendarTime(_)
            | Value::CalendarTimestamp(_) => self.to_decimal(),
            Value::Int(_)
            | Value::Long(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::Numeric(_)
            | Value::Decimal(_)
            | Value::Boolean(_) => self.to_decimal(),
            Value::String(s) => numeric::sniff_number(s)?.to_decimal(),
            other => Err(conversion_error("to_instant", other)),
        }
    }

    /// Total-order comparison against any other value; see
    /// [`ValueComparator`] for the ordering rules.
    pub fn compare_to(&self, other: &Value) -> Ordering {
        ValueComparator::compare(self, other)
    }

    /// Equality under the total order: numerically equal values of
    /// different numeric tags are equal.
    pub fn equals(&self, other: &Value) -> bool {
        ValueComparator::compare(self, other) == Ordering::Equal
    }

    /// Canonical i32 hash, consistent with [`Value::equals`].
    pub fn hash_code(&self) -> i32 {
        ValueComparator::hash_code(self)
    }

    /// Truncated display form for error context.
    pub(crate) fn display_snippet(&self) -> String {
        self.to_string().chars().take(10).collect()
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null(TypeTag::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        ValueComparator::compare(self, other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(ValueComparator::compare(self, other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        ValueComparator::compare(self, other)
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

/// Iterator over the elements of a collection value.
pub enum ElementIter<'a> {
    Once(Option<Value>),
    Slice(std::slice::Iter<'a, Value>),
    Dense(std::slice::Iter<'a, f64>),
    Sparse { vector: &'a SparseVector, index: usize },
}

impl<'a> Iterator for ElementIter<'a> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            ElementIter::Once(v) => v.take(),
            ElementIter::Slice(it) => it.next().cloned(),
            ElementIter::Dense(it) => it.next().map(|x| Value::Double(*x)),
            ElementIter::Sparse { vector, index } => {
                if *index < vector.len() {
                    let v = vector.get(*index);
                    *index += 1;
                    Some(Value::Double(v))
                } else {
                    None
                }
            }
        }
    }
}

fn conversion_error(operation: &str, value: &Value) -> EngineError {
    EngineError::type_mismatch(operation, value.type_name(), Some(value.display_snippet()))
}

fn sniff_binary(bytes: &[u8]) -> EngineResult<Value> {
    match std::str::from_utf8(bytes) {
        Ok(s) => numeric::sniff_number(s),
        Err(_) => Err(EngineError::malformed_number("<binary>")),
    }
}

fn decimal_to_long(operation: &str, d: &BigDecimal) -> EngineResult<i64> {
    d.with_scale_round(0, RoundingMode::Down)
        .to_i64()
        .ok_or_else(|| EngineError::numeric_overflow(operation, "DECIMAL out of i64 range"))
}

fn float_to_decimal(operation: &str, x: f64) -> EngineResult<BigDecimal> {
    BigDecimal::from_f64(x)
        .ok_or_else(|| EngineError::numeric_overflow(operation, "non-finite value"))
}

// --- temporal payloads: everything downstream works in milliseconds ---

pub(crate) fn date_to_millis(d: NaiveDate) -> i64 {
    d.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

pub(crate) fn datetime_to_millis(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

pub(crate) fn time_to_millis(t: NaiveTime) -> i64 {
    t.num_seconds_from_midnight() as i64 * 1000 + (t.nanosecond() / 1_000_000) as i64
}

pub(crate) fn millis_to_date(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc().date())
}

pub(crate) fn millis_to_datetime(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

pub(crate) fn millis_to_time(ms: i64) -> Option<NaiveTime> {
    let ms = ms.rem_euclid(MILLIS_PER_DAY);
    NaiveTime::from_num_seconds_from_midnight_opt((ms / 1000) as u32, ((ms % 1000) * 1_000_000) as u32)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null(_) => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Float(x) => write!(f, "{}", x),
            Value::Double(x) | Value::Numeric(x) => write!(f, "{}", x),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Complex(re, im) => {
                if im.is_sign_negative() && !im.is_nan() {
                    write!(f, "{}-{}i", re, -im)
                } else {
                    write!(f, "{}+{}i", re, im)
                }
            }
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Binary(bytes) => {
                write!(f, "0x")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) | Value::CalendarTime(t) => write!(f, "{}", t.format("%H:%M:%S%.3f")),
            Value::Timestamp(ts) | Value::CalendarTimestamp(ts) => {
                write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.3f"))
            }
            Value::Instant(d) => write!(f, "{}", d),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Set(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::DenseVector(xs) => {
                write!(f, "[")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", x)?;
                }
                write!(f, "]")
            }
            Value::SparseVector(sv) => {
                write!(f, "[")?;
                for i in 0..sv.len() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", sv.get(i))?;
                }
                write!(f, "]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null(_) => serializer.serialize_none(),
            Value::Int(i) => serializer.serialize_i32(*i),
            Value::Long(l) => serializer.serialize_i64(*l),
            Value::Float(x) => serializer.serialize_f32(*x),
            Value::Double(x) | Value::Numeric(x) => serializer.serialize_f64(*x),
            Value::Decimal(d) => serializer.serialize_str(&d.to_string()),
            Value::Complex(..) => serializer.serialize_str(&self.to_string()),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::String(s) => serializer.serialize_str(s),
            Value::Binary(b) => serializer.serialize_bytes(b),
            Value::Date(_)
            | Value::Time(_)
            | Value::Timestamp(_)
            | Value::CalendarTime(_)
            | Value::CalendarTimestamp(_) => serializer.serialize_str(&self.to_string()),
            Value::Instant(d) => serializer.serialize_str(&d.to_string()),
            Value::List(items) | Value::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
            Value::DenseVector(xs) => {
                let mut seq = serializer.serialize_seq(Some(xs.len()))?;
                for x in xs {
                    seq.serialize_element(x)?;
                }
                seq.end()
            }
            Value::SparseVector(sv) => sv.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a tagged value")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Boolean(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Long(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                if v <= i64::MAX as u64 {
                    Ok(Value::Long(v as i64))
                } else {
                    Ok(Value::Double(v as f64))
                }
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Double(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::String(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::String(v))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
                Ok(Value::Binary(v.to_vec()))
            }

            fn visit_none<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::null())
            }

            fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::null())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Value::List(items))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = ValueMap::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    map.put(&key, value);
                }
                Ok(Value::Map(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

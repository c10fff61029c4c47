//! Binary arithmetic driver: operand classification, null policy,
//! broadcasting over sequences, and dispatch into the numeric kernels.

use log::warn;

use crate::rowcore::error::{EngineError, EngineResult};
use crate::rowcore::value::numeric::is_complex_literal;
use crate::rowcore::value::tag::TypeTag;
use crate::rowcore::value::types::{millis_to_date, millis_to_datetime, millis_to_time};
use crate::rowcore::value::Value;

use super::numeric::{
    add_doubles, add_longs, as_big, as_complex, as_double, as_long, div_big, materialize, mul_big,
    mul_doubles, mul_longs, rem_big, resolve_scalar, sub_doubles, sub_longs, Num, CLASS_BIG,
    CLASS_COMPLEX, CLASS_DOUBLE, CLASS_LONG,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl BinOp {
    pub(crate) fn name(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Subtract => "subtract",
            BinOp::Multiply => "multiply",
            BinOp::Divide => "divide",
            BinOp::Remainder => "remainder",
        }
    }
}

/// Adds two values. With `null_as_zero`, a null operand is treated as
/// zero instead of propagating.
pub fn add(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Add, left, right, null_as_zero, false)
}

/// Subtracts `right` from `left`.
pub fn subtract(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Subtract, left, right, null_as_zero, false)
}

/// Multiplies two values.
pub fn multiply(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Multiply, left, right, null_as_zero, false)
}

/// Divides `left` by `right`. Division by zero or by null yields a typed
/// null; two integral operands divide in floating point.
pub fn divide(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Divide, left, right, null_as_zero, false)
}

/// Remainder of `left` by `right`, with the dividend's sign.
pub fn remainder(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Remainder, left, right, null_as_zero, false)
}

/// Like [`add`] but keeps temporal results in their numeric form instead
/// of rewrapping them.
pub fn add_numeric(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Add, left, right, null_as_zero, true)
}

/// Like [`subtract`] but without temporal rewrapping.
pub fn subtract_numeric(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Subtract, left, right, null_as_zero, true)
}

/// Like [`multiply`] but without temporal rewrapping.
pub fn multiply_numeric(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Multiply, left, right, null_as_zero, true)
}

/// Like [`divide`] but without temporal rewrapping.
pub fn divide_numeric(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Divide, left, right, null_as_zero, true)
}

/// Like [`remainder`] but without temporal rewrapping.
pub fn remainder_numeric(left: &Value, right: &Value, null_as_zero: bool) -> EngineResult<Value> {
    apply(BinOp::Remainder, left, right, null_as_zero, true)
}

pub(crate) fn apply(
    op: BinOp,
    left: &Value,
    right: &Value,
    null_as_zero: bool,
    numeric_only: bool,
) -> EngineResult<Value> {
    // actual keyed collections only; a typed null carrying a keyed tag
    // still propagates as null
    if is_keyed_value(left) || is_keyed_value(right) {
        let offender = if is_keyed_value(left) { left } else { right };
        return Err(keyed_error(op, offender));
    }
    if left.is_null() || right.is_null() {
        if null_as_zero {
            return null_substitute(op, left, right, numeric_only);
        }
        return Ok(Value::Null(result_tag(op, left, right, numeric_only)));
    }
    if left.type_tag().is_sequence() || right.type_tag().is_sequence() {
        return broadcast(op, left, right, null_as_zero, numeric_only);
    }
    scalar_binary(op, left, right, numeric_only)
}

fn is_keyed_value(value: &Value) -> bool {
    matches!(value, Value::Set(_) | Value::Map(_))
}

/// Keyed collections never take part in arithmetic; the error hints at
/// the intended alternative.
fn keyed_error(op: BinOp, offender: &Value) -> EngineError {
    let hint = match (op, offender.type_tag()) {
        (BinOp::Add, TypeTag::Set) => "use sequence union instead",
        (BinOp::Subtract, TypeTag::Set) => "use sequence difference instead",
        (BinOp::Multiply, TypeTag::Set) => "use sequence intersection instead",
        (_, TypeTag::Set) => "apply the operation element-wise over a LIST instead",
        _ => "operate on a selected field instead",
    };
    EngineError::type_mismatch_hint(
        op.name(),
        offender.type_name(),
        Some(offender.display_snippet()),
        hint,
    )
}

/// Null substitution under the null-as-zero policy: the null side becomes
/// zero and the operation re-runs. A null divisor stays null regardless.
fn null_substitute(
    op: BinOp,
    left: &Value,
    right: &Value,
    numeric_only: bool,
) -> EngineResult<Value> {
    if matches!(op, BinOp::Divide | BinOp::Remainder) && right.is_null() {
        return Ok(Value::Null(result_tag(op, left, right, numeric_only)));
    }
    let zero = Value::Long(0);
    let left = if left.is_null() { &zero } else { left };
    let right = if right.is_null() { &zero } else { right };
    apply(op, left, right, false, numeric_only)
}

/// The tag a null result carries: the promoted class of the two operands,
/// adjusted for the operation and rewrapped for a lone temporal side.
fn result_tag(op: BinOp, left: &Value, right: &Value, numeric_only: bool) -> TypeTag {
    let left_tag = left.natural_tag();
    let right_tag = right.natural_tag();
    if left_tag.is_sequence() {
        return left_tag;
    }
    if right_tag.is_sequence() {
        return right_tag;
    }
    let class = operand_class(left).max(operand_class(right));
    if !numeric_only && left_tag.is_temporal() != right_tag.is_temporal() {
        let temporal = if left_tag.is_temporal() { left_tag } else { right_tag };
        match class {
            CLASS_LONG if op != BinOp::Divide => return temporal,
            CLASS_BIG => return TypeTag::Instant,
            _ => {}
        }
    }
    match op {
        BinOp::Divide if class == CLASS_LONG => TypeTag::Double,
        _ => match class {
            CLASS_LONG => TypeTag::Long,
            CLASS_DOUBLE => TypeTag::Double,
            CLASS_BIG => TypeTag::Decimal,
            _ => TypeTag::Complex,
        },
    }
}

pub(crate) fn operand_class(value: &Value) -> u8 {
    let tag = value.natural_tag();
    if tag == TypeTag::Complex {
        CLASS_COMPLEX
    } else if tag.is_decimal_like() {
        CLASS_BIG
    } else if tag.is_floating() {
        CLASS_DOUBLE
    } else if tag == TypeTag::String || tag == TypeTag::Binary {
        match value {
            Value::String(s) => sniffed_class(s),
            Value::Binary(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => sniffed_class(s),
                Err(_) => CLASS_DOUBLE,
            },
            _ => CLASS_LONG,
        }
    } else {
        // integral-like tags, plain NULL, and everything that will fail
        // later resolve to the bottom class
        CLASS_LONG
    }
}

fn sniffed_class(s: &str) -> u8 {
    let trimmed = s.trim();
    if is_complex_literal(trimmed) {
        CLASS_COMPLEX
    } else if Value::String(trimmed.to_string()).is_digits() {
        CLASS_LONG
    } else {
        CLASS_DOUBLE
    }
}

// --- broadcasting ---

fn broadcast(
    op: BinOp,
    left: &Value,
    right: &Value,
    null_as_zero: bool,
    numeric_only: bool,
) -> EngineResult<Value> {
    let left_seq = left.type_tag().is_sequence();
    let right_seq = right.type_tag().is_sequence();
    if left_seq && right_seq {
        if left.size() != right.size() {
            return Err(EngineError::size_mismatch(op.name(), left.size(), right.size()));
        }
        if left.type_tag() == TypeTag::List || right.type_tag() == TypeTag::List {
            let out: EngineResult<Vec<Value>> = left
                .elements()
                .zip(right.elements())
                .map(|(a, b)| apply(op, &a, &b, null_as_zero, numeric_only))
                .collect();
            return Ok(Value::List(out?));
        }
        // pure vector pairs compute in plain f64 space
        let out: Vec<f64> = vector_values(left)
            .zip(vector_values(right))
            .map(|(x, y)| scalar_f64(op, x, y))
            .collect();
        return Ok(Value::DenseVector(out));
    }

    let (sequence, scalar, scalar_on_right) =
        if left_seq { (left, right, true) } else { (right, left, false) };

    // identity short-circuits leave the sequence untouched
    if identity_short_circuit(op, scalar, scalar_on_right) {
        return Ok(sequence.clone());
    }

    match sequence {
        Value::List(items) => {
            let out: EngineResult<Vec<Value>> = items
                .iter()
                .map(|item| {
                    if scalar_on_right {
                        apply(op, item, scalar, null_as_zero, numeric_only)
                    } else {
                        apply(op, scalar, item, null_as_zero, numeric_only)
                    }
                })
                .collect();
            Ok(Value::List(out?))
        }
        Value::DenseVector(items) => {
            let resolved = resolve_scalar(op.name(), scalar)?;
            if resolved.class() == CLASS_COMPLEX {
                return broadcast_complex(op, sequence, scalar, scalar_on_right, numeric_only);
            }
            let s = as_double(&resolved);
            let out = items
                .iter()
                .map(|&x| {
                    if scalar_on_right {
                        scalar_f64(op, x, s)
                    } else {
                        scalar_f64(op, s, x)
                    }
                })
                .collect();
            Ok(Value::DenseVector(out))
        }
        Value::SparseVector(sv) => {
            let resolved = resolve_scalar(op.name(), scalar)?;
            if resolved.class() == CLASS_COMPLEX {
                return broadcast_complex(op, sequence, scalar, scalar_on_right, numeric_only);
            }
            let s = as_double(&resolved);
            if sparse_pattern_preserved(op, scalar_on_right) {
                let mapped = sv.map_values(|x| {
                    if scalar_on_right {
                        scalar_f64(op, x, s)
                    } else {
                        scalar_f64(op, s, x)
                    }
                });
                Ok(Value::SparseVector(mapped))
            } else {
                // implicit zeros change value, so the result densifies
                let out = (0..sv.len())
                    .map(|i| {
                        let x = sv.get(i);
                        if scalar_on_right {
                            scalar_f64(op, x, s)
                        } else {
                            scalar_f64(op, s, x)
                        }
                    })
                    .collect();
                Ok(Value::DenseVector(out))
            }
        }
        _ => Err(EngineError::type_mismatch(
            op.name(),
            sequence.type_name(),
            Some(sequence.display_snippet()),
        )),
    }
}

/// A complex scalar cannot live inside an f64 vector, so the result is a
/// list of complex values.
fn broadcast_complex(
    op: BinOp,
    sequence: &Value,
    scalar: &Value,
    scalar_on_right: bool,
    numeric_only: bool,
) -> EngineResult<Value> {
    let out: EngineResult<Vec<Value>> = sequence
        .elements()
        .map(|item| {
            if scalar_on_right {
                apply(op, &item, scalar, false, numeric_only)
            } else {
                apply(op, scalar, &item, false, numeric_only)
            }
        })
        .collect();
    Ok(Value::List(out?))
}

fn vector_values<'a>(value: &'a Value) -> Box<dyn Iterator<Item = f64> + 'a> {
    match value {
        Value::DenseVector(items) => Box::new(items.iter().copied()),
        Value::SparseVector(sv) => Box::new((0..sv.len()).map(move |i| sv.get(i))),
        _ => Box::new(std::iter::empty()),
    }
}

fn identity_short_circuit(op: BinOp, scalar: &Value, scalar_on_right: bool) -> bool {
    let equals = |target: f64| scalar.to_double().map(|x| x == target).unwrap_or(false);
    match op {
        BinOp::Add => equals(0.0),
        BinOp::Subtract => scalar_on_right && equals(0.0),
        BinOp::Multiply => equals(1.0),
        BinOp::Divide => scalar_on_right && equals(1.0),
        BinOp::Remainder => false,
    }
}

/// Stored-values-only mapping is exact when the operation sends implicit
/// zeros to zero.
fn sparse_pattern_preserved(op: BinOp, scalar_on_right: bool) -> bool {
    match op {
        BinOp::Multiply => true,
        BinOp::Divide | BinOp::Remainder => scalar_on_right,
        BinOp::Add | BinOp::Subtract => false,
    }
}

/// Raw f64 kernel used inside vectors; IEEE semantics apply, including
/// division by zero.
fn scalar_f64(op: BinOp, x: f64, y: f64) -> f64 {
    match op {
        BinOp::Add => x + y,
        BinOp::Subtract => x - y,
        BinOp::Multiply => x * y,
        BinOp::Divide => x / y,
        BinOp::Remainder => x % y,
    }
}

// --- scalar dispatch ---

fn scalar_binary(op: BinOp, left: &Value, right: &Value, numeric_only: bool) -> EngineResult<Value> {
    let operation = op.name();
    let a = resolve_scalar(operation, left)?;
    let b = resolve_scalar(operation, right)?;

    if matches!(op, BinOp::Divide | BinOp::Remainder) && b.is_zero() {
        return Ok(Value::Null(result_tag(op, left, right, numeric_only)));
    }
    if op == BinOp::Divide && b.is_one() {
        // dividing by the multiplicative identity returns the dividend
        return Ok(left.clone());
    }

    let class = a.class().max(b.class());
    let result = match class {
        CLASS_LONG => long_kernel(op, operation, as_long(&a), as_long(&b))?,
        CLASS_DOUBLE => double_kernel(op, operation, as_double(&a), as_double(&b))?,
        CLASS_BIG => big_kernel(op, operation, &a, &b)?,
        _ => complex_kernel(op, operation, as_complex(&a), as_complex(&b))?,
    };
    finish(op, left, right, result, numeric_only)
}

fn long_kernel(op: BinOp, operation: &str, x: i64, y: i64) -> EngineResult<Num> {
    Ok(match op {
        BinOp::Add => add_longs(x, y),
        BinOp::Subtract => sub_longs(x, y),
        BinOp::Multiply => mul_longs(operation, x, y)?,
        // integral division is lossy, so it promotes to floating point
        BinOp::Divide => Num::Double(x as f64 / y as f64),
        // i64::MIN % -1 overflows checked_rem but is exactly zero
        BinOp::Remainder => Num::Long(x.checked_rem(y).unwrap_or(0)),
    })
}

fn double_kernel(op: BinOp, operation: &str, x: f64, y: f64) -> EngineResult<Num> {
    Ok(match op {
        BinOp::Add => add_doubles(x, y),
        BinOp::Subtract => sub_doubles(x, y),
        BinOp::Multiply => mul_doubles(operation, x, y)?,
        BinOp::Divide => Num::Double(x / y),
        BinOp::Remainder => Num::Double(x % y),
    })
}

fn big_kernel(op: BinOp, operation: &str, a: &Num, b: &Num) -> EngineResult<Num> {
    let x = as_big(operation, a)?;
    let y = as_big(operation, b)?;
    Ok(Num::Big(match op {
        BinOp::Add => x + y,
        BinOp::Subtract => x - y,
        BinOp::Multiply => mul_big(operation, &x, &y)?,
        BinOp::Divide => div_big(operation, &x, &y)?,
        BinOp::Remainder => rem_big(operation, &x, &y)?,
    }))
}

fn complex_kernel(
    op: BinOp,
    operation: &str,
    (ar, ai): (f64, f64),
    (br, bi): (f64, f64),
) -> EngineResult<Num> {
    Ok(match op {
        BinOp::Add => Num::Complex(ar + br, ai + bi),
        BinOp::Subtract => Num::Complex(ar - br, ai - bi),
        BinOp::Multiply => Num::Complex(ar * br - ai * bi, ar * bi + ai * br),
        BinOp::Divide => {
            let denominator = br * br + bi * bi;
            Num::Complex(
                (ar * br + ai * bi) / denominator,
                (ai * br - ar * bi) / denominator,
            )
        }
        BinOp::Remainder => {
            return Err(EngineError::type_mismatch_hint(
                operation,
                "COMPLEX",
                None,
                "remainder is not defined for complex numbers",
            ))
        }
    })
}

/// Wraps a finished computation: when exactly one operand was temporal,
/// an integral result goes back into that temporal type and a decimal
/// result becomes an INSTANT. Floating and complex results stay numeric.
fn finish(
    op: BinOp,
    left: &Value,
    right: &Value,
    result: Num,
    numeric_only: bool,
) -> EngineResult<Value> {
    if !numeric_only {
        let left_temporal = left.natural_tag().is_temporal();
        let right_temporal = right.natural_tag().is_temporal();
        if left_temporal != right_temporal {
            let tag = if left_temporal { left.natural_tag() } else { right.natural_tag() };
            match result {
                Num::Long(ms) => return Ok(rewrap_millis(op.name(), tag, ms)),
                Num::Big(d) => return Ok(Value::Instant(d)),
                _ => {}
            }
        }
    }
    Ok(materialize(result))
}

fn rewrap_millis(operation: &str, tag: TypeTag, ms: i64) -> Value {
    let rebuilt = match tag {
        TypeTag::Date => millis_to_date(ms).map(Value::Date),
        TypeTag::Time => millis_to_time(ms).map(Value::Time),
        TypeTag::CalendarTime => millis_to_time(ms).map(Value::CalendarTime),
        TypeTag::Timestamp => millis_to_datetime(ms).map(Value::Timestamp),
        TypeTag::CalendarTimestamp => millis_to_datetime(ms).map(Value::CalendarTimestamp),
        TypeTag::Instant => Some(Value::Instant(bigdecimal::BigDecimal::from(ms))),
        _ => None,
    };
    match rebuilt {
        Some(v) => v,
        None => {
            warn!("{}: {} ms does not fit in {}; yielding NULL", operation, ms, tag);
            Value::Null(tag)
        }
    }
}

//! Ordering predicates over values. Scalars and non-set sequences follow
//! the value total order; sets quantify — existentially on the left,
//! universally on the right.

use std::cmp::Ordering;

use crate::rowcore::error::{EngineError, EngineResult};
use crate::rowcore::value::comparator::ValueComparator;
use crate::rowcore::value::Value;

#[derive(Debug, Clone, Copy)]
enum CmpOp {
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    fn name(self) -> &'static str {
        match self {
            CmpOp::Gt => "gt",
            CmpOp::Ge => "ge",
            CmpOp::Lt => "lt",
            CmpOp::Le => "le",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// `left > right`. Null orders lowest, so `gt(x, null)` is true for any
/// non-null x and `gt(null, null)` is false.
pub fn gt(left: &Value, right: &Value) -> EngineResult<bool> {
    compare_with(CmpOp::Gt, left, right)
}

/// `left >= right`; `ge(null, null)` is true.
pub fn ge(left: &Value, right: &Value) -> EngineResult<bool> {
    compare_with(CmpOp::Ge, left, right)
}

/// `left < right`; `lt(null, x)` is true for any non-null x.
pub fn lt(left: &Value, right: &Value) -> EngineResult<bool> {
    compare_with(CmpOp::Lt, left, right)
}

/// `left <= right`; `le(null, null)` is true.
pub fn le(left: &Value, right: &Value) -> EngineResult<bool> {
    compare_with(CmpOp::Le, left, right)
}

fn compare_with(op: CmpOp, left: &Value, right: &Value) -> EngineResult<bool> {
    // actual maps only; a typed null with a map tag still orders as null
    if matches!(left, Value::Map(_)) || matches!(right, Value::Map(_)) {
        let offender = if matches!(left, Value::Map(_)) { left } else { right };
        return Err(EngineError::type_mismatch_hint(
            op.name(),
            offender.type_name(),
            Some(offender.display_snippet()),
            "operate on a selected field instead",
        ));
    }
    match (left, right) {
        // some left member beats all right members
        (Value::Set(ls), Value::Set(rs)) => Ok(ls
            .iter()
            .any(|l| rs.iter().all(|r| op.accepts(ValueComparator::compare(l, r))))),
        (Value::Set(ls), _) => Ok(ls
            .iter()
            .any(|l| op.accepts(ValueComparator::compare(l, right)))),
        (_, Value::Set(rs)) => Ok(rs
            .iter()
            .all(|r| op.accepts(ValueComparator::compare(left, r)))),
        _ => Ok(op.accepts(ValueComparator::compare(left, right))),
    }
}

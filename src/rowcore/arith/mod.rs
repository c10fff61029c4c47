//! Dynamic arithmetic over [`Value`](crate::rowcore::value::Value)
//! operands: the binary family with null policy, overflow fallback and
//! broadcasting, exponentiation, the unary math family, scale-aware
//! rounding, and quantified ordering predicates.

mod binary;
mod compare;
mod numeric;
mod power;
mod rounding;
mod unary;

pub use binary::{
    add, add_numeric, divide, divide_numeric, multiply, multiply_numeric, remainder,
    remainder_numeric, subtract, subtract_numeric,
};
pub use compare::{ge, gt, le, lt};
pub use power::power;
pub use rounding::{ceil, floor, round, truncate};
pub use unary::{
    abs, acos, asin, atan, atan2, cbrt, cos, cosh, exp, expm1, ln, log, log10, negate, sin, sinh,
    sqrt, tan, tanh,
};

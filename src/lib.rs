//! # rowcore
//!
//! Value and row model for a tabular data-processing engine: dynamically
//! tagged values with full arithmetic and comparison semantics, rows of
//! named fields that preserve insertion order, grouping-key tuples, windowed
//! row buffers, and a compact binary wire format.

// Allow certain clippy warnings for development
#![allow(clippy::derivable_impls)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::wrong_self_convention)]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::large_enum_variant)]
//!
//! ## Features
//!
//! - **Tagged Values**: a closed set of ~22 value tags (integers, floats,
//!   arbitrary-precision decimals, complex numbers, strings, temporals,
//!   lists, sets, maps, vectors) with typed nulls
//! - **Arithmetic Engine**: type-promoting add/subtract/multiply/divide/
//!   remainder/power with overflow-to-decimal fallback, broadcasting over
//!   sequences, and a full unary/rounding/comparison family
//! - **Ordered Rows**: hash-indexed field maps that preserve insertion
//!   order through arbitrary put/remove churn
//! - **Windowed Streams**: circular row buffers with prior/current/post
//!   addressing
//! - **Binary Codec**: length-prefixed big-endian serialization for values,
//!   rows, and keys
//!
//! ## Quick Start
//!
//! ```rust
//! use rowcore::{arith, Record, Value};
//!
//! fn main() -> Result<(), rowcore::EngineError> {
//!     let mut row = Record::new();
//!     row.set("qty", Value::Int(3));
//!     row.set("price", Value::Double(2.5));
//!
//!     let total = arith::multiply(
//!         row.get("qty").unwrap(),
//!         row.get("price").unwrap(),
//!         false,
//!     )?;
//!     assert_eq!(total, Value::Double(7.5));
//!     Ok(())
//! }
//! ```

// Export the rowcore module structure
pub mod rowcore;

// Re-export main API at crate root for easy access
pub use rowcore::arith;
pub use rowcore::{
    // Errors
    EngineError,
    EngineResult,
    // Grouping keys
    Ident,
    // Containers
    OrderedMap,
    // Core types
    Record,
    RecordQueue,
    SparseVector,
    TypeTag,
    Value,
    ValueComparator,
    ValueMap,
    WindowView,
};

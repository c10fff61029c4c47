//! Core modules: values, rows, keys, windows, arithmetic, serialization.

pub mod arith;
pub mod error;
pub mod ident;
pub mod record;
pub mod serialization;
pub mod value;

pub use error::{EngineError, EngineResult};
pub use ident::Ident;
pub use record::{OrderedMap, Record, RecordQueue, ValueMap, WindowView};
pub use value::{SparseVector, TypeTag, Value, ValueComparator};

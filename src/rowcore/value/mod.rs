//! Dynamically tagged values: the closed tag set, the `Value` enum and its
//! capability surface, literal sniffing, and the cross-type comparator.

pub mod comparator;
pub mod numeric;
pub mod tag;
pub mod types;

pub use comparator::ValueComparator;
pub use tag::TypeTag;
pub use types::{SparseVector, Value};

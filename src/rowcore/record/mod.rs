//! Rows and row containers: the ordered field map, records, and windowed
//! row buffers.

pub mod ordered_map;
pub mod queue;
pub mod row;

pub use ordered_map::OrderedMap;
pub use queue::{RecordQueue, WindowView};
pub use row::Record;

/// Field storage: values keyed by name in insertion order.
pub type ValueMap = OrderedMap<crate::rowcore::value::Value>;

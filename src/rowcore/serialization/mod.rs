//! Wire encoding for values, rows, and idents.

pub mod binary;

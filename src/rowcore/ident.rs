//! Grouping and sort keys: small tuples of values, specialized by arity.
//!
//! Most keys in practice have zero, one, or two elements, so those arities
//! get dedicated variants with no heap allocation; wider keys fall back to
//! a vector. Idents hash and compare by their element sequence, so they can
//! key std hash maps directly.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::rowcore::value::{Value, ValueComparator};

/// Reserved hash for the empty ident, distinct from any folded element hash.
pub const EMPTY_IDENT_HASH: i32 = i32::MIN;

/// A key tuple of values, specialized by arity.
#[derive(Debug, Clone)]
pub enum Ident {
    Empty,
    One(Value),
    Two(Value, Value),
    Many(Vec<Value>),
}

impl Ident {
    /// Builds the smallest variant that holds `values`.
    pub fn from_values(mut values: Vec<Value>) -> Ident {
        match values.len() {
            0 => Ident::Empty,
            1 => Ident::One(values.pop().unwrap()),
            2 => {
                let second = values.pop().unwrap();
                let first = values.pop().unwrap();
                Ident::Two(first, second)
            }
            _ => Ident::Many(values),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Ident::Empty => 0,
            Ident::One(_) => 1,
            Ident::Two(..) => 2,
            Ident::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Ident::Empty)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        match (self, index) {
            (Ident::One(v), 0) => Some(v),
            (Ident::Two(v, _), 0) => Some(v),
            (Ident::Two(_, v), 1) => Some(v),
            (Ident::Many(values), i) => values.get(i),
            _ => None,
        }
    }

    /// Replaces the element at `index`. Panics when out of range, like
    /// slice indexing.
    pub fn set(&mut self, index: usize, value: Value) {
        let len = self.len();
        match (&mut *self, index) {
            (Ident::One(slot), 0) => *slot = value,
            (Ident::Two(slot, _), 0) => *slot = value,
            (Ident::Two(_, slot), 1) => *slot = value,
            (Ident::Many(values), i) if i < values.len() => values[i] = value,
            _ => panic!("ident index {} out of range for {} elements", index, len),
        }
    }

    pub fn iter(&self) -> IdentIter<'_> {
        IdentIter {
            ident: self,
            index: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    /// A new ident with `extra` appended after this one's elements.
    pub fn with_appended(&self, extra: &[Value]) -> Ident {
        let mut values = self.to_vec();
        values.extend_from_slice(extra);
        Ident::from_values(values)
    }

    /// The elements in `begin..end`, clamped to bounds; an inverted range
    /// yields the empty ident.
    pub fn slice(&self, begin: usize, end: usize) -> Ident {
        let len = self.len();
        let begin = begin.min(len);
        let end = end.min(len);
        if begin >= end {
            return Ident::Empty;
        }
        let values = (begin..end)
            .filter_map(|i| self.get(i).cloned())
            .collect();
        Ident::from_values(values)
    }

    /// Concatenation of two idents.
    pub fn merge(&self, other: &Ident) -> Ident {
        let mut values = self.to_vec();
        values.extend(other.iter().cloned());
        Ident::from_values(values)
    }

    /// Elementwise comparison by the value total order; equal prefixes
    /// decide by arity.
    pub fn compare_to(&self, other: &Ident) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            let ord = ValueComparator::compare(a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.len().cmp(&other.len())
    }

    /// Canonical hash: the empty ident gets a reserved sentinel, every
    /// other arity folds element hashes with the shared ×109 multiplier.
    pub fn hash_code(&self) -> i32 {
        if self.is_empty() {
            return EMPTY_IDENT_HASH;
        }
        self.iter().fold(0i32, |h, v| {
            h.wrapping_mul(109).wrapping_add(v.hash_code())
        })
    }
}

impl Default for Ident {
    fn default() -> Self {
        Ident::Empty
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.compare_to(other) == Ordering::Equal
    }
}

impl Eq for Ident {}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_to(other))
    }
}

impl Ord for Ident {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

pub struct IdentIter<'a> {
    ident: &'a Ident,
    index: usize,
}

impl<'a> Iterator for IdentIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        let item = self.ident.get(self.index);
        if item.is_some() {
            self.index += 1;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_selection() {
        assert!(matches!(Ident::from_values(vec![]), Ident::Empty));
        assert!(matches!(
            Ident::from_values(vec![Value::Int(1)]),
            Ident::One(_)
        ));
        assert!(matches!(
            Ident::from_values(vec![Value::Int(1), Value::Int(2)]),
            Ident::Two(..)
        ));
        assert!(matches!(
            Ident::from_values(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
            Ident::Many(_)
        ));
    }

    #[test]
    fn test_two_keeps_element_order() {
        let ident = Ident::from_values(vec![Value::Int(10), Value::Int(20)]);
        assert_eq!(ident.get(0), Some(&Value::Int(10)));
        assert_eq!(ident.get(1), Some(&Value::Int(20)));
        assert_eq!(ident.get(2), None);
    }

    #[test]
    fn test_empty_hash_sentinel() {
        assert_eq!(Ident::Empty.hash_code(), EMPTY_IDENT_HASH);
        let one = Ident::from_values(vec![Value::Int(0)]);
        assert_ne!(one.hash_code(), EMPTY_IDENT_HASH);
    }

    #[test]
    fn test_slice_and_merge() {
        let ident = Ident::from_values(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let mid = ident.slice(1, 3);
        assert_eq!(mid, Ident::from_values(vec![Value::Int(2), Value::Int(3)]));
        assert!(matches!(ident.slice(2, 1), Ident::Empty));
        assert!(matches!(ident.slice(5, 9), Ident::Empty));

        let merged = mid.merge(&Ident::from_values(vec![Value::Int(9)]));
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get(2), Some(&Value::Int(9)));
    }

    #[test]
    fn test_appended_promotes_arity() {
        let one = Ident::from_values(vec![Value::Int(1)]);
        let two = one.with_appended(&[Value::Int(2)]);
        assert!(matches!(two, Ident::Two(..)));
        let four = two.with_appended(&[Value::Int(3), Value::Int(4)]);
        assert!(matches!(four, Ident::Many(_)));
        assert_eq!(four.len(), 4);
    }
}

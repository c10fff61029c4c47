//! A row of named fields in insertion order.
//!
//! Records compare, sort, and hash by their value sequence alone; field
//! names address values but never participate in ordering, so rows from
//! differently named sources can still be grouped and sorted together.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::rowcore::ident::Ident;
use crate::rowcore::record::ValueMap;
use crate::rowcore::value::{Value, ValueComparator};

/// A row: values keyed by field name, ordered by first insertion.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: ValueMap,
}

impl Record {
    pub fn new() -> Record {
        Record {
            fields: ValueMap::new(),
        }
    }

    /// A record with room for `capacity` fields before any growth.
    pub fn with_capacity(capacity: usize) -> Record {
        Record {
            fields: ValueMap::with_capacity(capacity),
        }
    }

    /// Builds a record from name/value pairs, keeping their order.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> Record {
        let mut record = Record::new();
        for (name, value) in pairs {
            record.set(name, value);
        }
        record
    }

    /// Sets a field. An existing name keeps its position and returns the
    /// old value; a new name appends at the end of the row.
    pub fn set(&mut self, name: &str, value: Value) -> Option<Value> {
        self.fields.put(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Position of `name` in the row, if present.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.index_of(name)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field name at `ordinal`; panics out of range.
    pub fn name_at(&self, ordinal: usize) -> &str {
        self.fields.key_at(ordinal)
    }

    /// Field value at `ordinal`; panics out of range.
    pub fn value_at(&self, ordinal: usize) -> &Value {
        self.fields.value_at(ordinal)
    }

    pub fn value_at_mut(&mut self, ordinal: usize) -> &mut Value {
        self.fields.value_at_mut(ordinal)
    }

    /// Replaces the value at `ordinal`, returning the old one.
    pub fn set_value_at(&mut self, ordinal: usize, value: Value) -> Value {
        self.fields.set_value_at(ordinal, value)
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Removes the field at `ordinal`, shifting later fields down.
    pub fn remove_at(&mut self, ordinal: usize) -> Value {
        self.fields.remove_at(ordinal)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.fields.values()
    }

    pub fn fields(&self) -> &ValueMap {
        &self.fields
    }

    pub fn into_fields(self) -> ValueMap {
        self.fields
    }

    /// Builds a grouping key from the fields at `ordinals`, cloning the
    /// selected values. Panics when an ordinal is out of range.
    pub fn key_ident(&self, ordinals: &[usize]) -> Ident {
        let values = ordinals
            .iter()
            .map(|&i| self.fields.value_at(i).clone())
            .collect();
        Ident::from_values(values)
    }

    /// Comparison by the value sequence; field names are excluded.
    pub fn compare_to(&self, other: &Record) -> Ordering {
        ValueComparator::compare_slices(self.fields.value_slice(), other.fields.value_slice())
    }

    /// Canonical hash over the value sequence, consistent with
    /// [`Record::compare_to`] equality.
    pub fn hash_code(&self) -> i32 {
        self.fields
            .value_slice()
            .iter()
            .fold(0i32, |h, v| h.wrapping_mul(109).wrapping_add(v.hash_code()))
    }

    /// JSON object form of the row, fields in order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Record> {
        serde_json::from_str(json)
    }
}

impl From<ValueMap> for Record {
    fn from(fields: ValueMap) -> Record {
        Record { fields }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.compare_to(other) == Ordering::Equal
    }
}

impl Eq for Record {}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_to(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Record, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Record, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut record = Record::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    record.set(&name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_and_order() {
        let mut row = Record::new();
        row.set("b", Value::Int(2));
        row.set("a", Value::Int(1));
        row.set("b", Value::Int(20));
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("b"), Some(&Value::Int(20)));
        assert_eq!(row.name_at(0), "b"); // overwrite keeps position
        assert_eq!(row.field_index("a"), Some(1));
    }

    #[test]
    fn test_rows_compare_by_values_not_names() {
        let left = Record::from_pairs([("x", Value::Int(1)), ("y", Value::Int(2))]);
        let right = Record::from_pairs([("a", Value::Long(1)), ("b", Value::Long(2))]);
        assert_eq!(left, right);
        assert_eq!(left.hash_code(), right.hash_code());

        let bigger = Record::from_pairs([("x", Value::Int(1)), ("y", Value::Int(3))]);
        assert_eq!(left.compare_to(&bigger), Ordering::Less);
    }

    #[test]
    fn test_key_ident() {
        let row = Record::from_pairs([
            ("region", Value::String("east".into())),
            ("sku", Value::Int(7)),
            ("qty", Value::Int(40)),
        ]);
        let key = row.key_ident(&[0, 1]);
        assert_eq!(key.len(), 2);
        assert_eq!(key.get(0), Some(&Value::String("east".into())));
        assert_eq!(key.get(1), Some(&Value::Int(7)));
    }

    #[test]
    fn test_json_object_in_field_order() {
        let row = Record::from_pairs([("b", Value::Int(1)), ("a", Value::Boolean(true))]);
        assert_eq!(row.to_json().unwrap(), r#"{"b":1,"a":true}"#);

        let back = Record::from_json(r#"{"b":1,"a":true}"#).unwrap();
        assert_eq!(back.name_at(0), "b");
        assert_eq!(back.get("a"), Some(&Value::Boolean(true)));
    }
}

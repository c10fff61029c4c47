//! Order-preserving keyed container with an open-addressed hash index.
//!
//! Entries live in parallel insertion-ordered arrays; a power-of-two slot
//! table maps hash probes to ordinals so lookup stays O(1) while iteration
//! order stays the order keys were first inserted. Removal tombstones the
//! slot and fixes the ordinals above the removed entry, so positional
//! access remains dense.

use log::debug;

const EMPTY_SLOT: i32 = -1;
const TOMBSTONE: i32 = -2;
const MIN_SLOTS: usize = 16;

/// Multiplicative string hash shared by the slot index, value hashing, and
/// key-tuple hashing: `h = h*109 + char` in wrapping i32 arithmetic.
pub(crate) fn string_hash(key: &str) -> i32 {
    let mut h: i32 = 0;
    for c in key.chars() {
        h = h.wrapping_mul(109).wrapping_add(c as i32);
    }
    h
}

enum Probe {
    Found { slot: usize, ordinal: usize },
    Absent { slot: usize },
}

/// Keyed values that iterate in insertion order.
///
/// The slot table holds ordinals into the entry arrays, `EMPTY_SLOT` for
/// never-used cells and `TOMBSTONE` for removed ones. Occupancy (live plus
/// tombstones) is kept at or below a 0.8 load factor; crossing it triggers
/// a rehash sized for the live count alone, which discards tombstones.
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    keys: Vec<String>,
    values: Vec<V>,
    slots: Vec<i32>,
    tombstones: usize,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        OrderedMap {
            keys: Vec::new(),
            values: Vec::new(),
            slots: vec![EMPTY_SLOT; MIN_SLOTS],
            tombstones: 0,
        }
    }

    /// A map with room for `capacity` entries before any growth.
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            slots: vec![EMPTY_SLOT; Self::slots_for(capacity)],
            tombstones: 0,
        }
    }

    // smallest power-of-two table that keeps `entries` at or under the 0.8
    // load cap
    fn slots_for(entries: usize) -> usize {
        let needed = entries.saturating_mul(5) / 4 + 1;
        needed.max(MIN_SLOTS).next_power_of_two()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn probe(&self, key: &str) -> Probe {
        let mask = self.slots.len() - 1;
        let hash = string_hash(key);
        let bits = self.slots.len().trailing_zeros();
        let mut idx = (hash & mask as i32) as usize;
        let step = {
            let s = (((hash as u32) >> bits) as usize) & mask;
            if s == 0 {
                1
            } else {
                s
            }
        };
        let mut candidate: Option<usize> = None;
        for _ in 0..=self.slots.len() {
            match self.slots[idx] {
                EMPTY_SLOT => {
                    return Probe::Absent {
                        slot: candidate.unwrap_or(idx),
                    }
                }
                TOMBSTONE => {
                    if candidate.is_none() {
                        candidate = Some(idx);
                    }
                }
                ordinal => {
                    if self.keys[ordinal as usize] == key {
                        return Probe::Found {
                            slot: idx,
                            ordinal: ordinal as usize,
                        };
                    }
                }
            }
            idx = (idx + step) & mask;
        }
        // a full cycle that passed a tombstone still proves the key absent
        match candidate {
            Some(slot) => Probe::Absent { slot },
            None => panic!("ordered map probe cycled without finding a free slot; index is corrupt"),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        match self.probe(key) {
            Probe::Found { ordinal, .. } => Some(&self.values[ordinal]),
            Probe::Absent { .. } => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.probe(key) {
            Probe::Found { ordinal, .. } => Some(&mut self.values[ordinal]),
            Probe::Absent { .. } => None,
        }
    }

    /// Ordinal (insertion position) of `key`, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        match self.probe(key) {
            Probe::Found { ordinal, .. } => Some(ordinal),
            Probe::Absent { .. } => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        matches!(self.probe(key), Probe::Found { .. })
    }

    /// Inserts or overwrites. An existing key keeps its ordinal and the old
    /// value is returned; a new key appends at the end of the order.
    pub fn put(&mut self, key: &str, value: V) -> Option<V> {
        match self.probe(key) {
            Probe::Found { ordinal, .. } => {
                Some(std::mem::replace(&mut self.values[ordinal], value))
            }
            Probe::Absent { slot } => {
                let mut slot = slot;
                let reusing_tombstone = self.slots[slot] == TOMBSTONE;
                let occupancy =
                    self.keys.len() + 1 + self.tombstones - (reusing_tombstone as usize);
                if occupancy * 5 > self.slots.len() * 4 {
                    self.rehash(self.keys.len() + 1);
                    slot = match self.probe(key) {
                        Probe::Absent { slot } => slot,
                        Probe::Found { .. } => {
                            panic!("key appeared during rehash; index is corrupt")
                        }
                    };
                }
                self.reserve_for_push();
                let ordinal = self.keys.len() as i32;
                self.keys.push(key.to_string());
                self.values.push(value);
                if self.slots[slot] == TOMBSTONE {
                    self.tombstones -= 1;
                }
                self.slots[slot] = ordinal;
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        match self.probe(key) {
            Probe::Found { slot, ordinal } => Some(self.remove_entry(slot, ordinal)),
            Probe::Absent { .. } => None,
        }
    }

    /// Removes the entry at `ordinal`, preserving the order of the rest.
    /// Panics when out of range, like `Vec` removal.
    pub fn remove_at(&mut self, ordinal: usize) -> V {
        let key = self.keys[ordinal].clone();
        match self.probe(&key) {
            Probe::Found { slot, .. } => self.remove_entry(slot, ordinal),
            Probe::Absent { .. } => panic!("entry at ordinal {} is not indexed; index is corrupt", ordinal),
        }
    }

    fn remove_entry(&mut self, slot: usize, ordinal: usize) -> V {
        self.slots[slot] = TOMBSTONE;
        self.tombstones += 1;
        self.keys.remove(ordinal);
        let value = self.values.remove(ordinal);
        // every ordinal above the removed entry shifted down by one
        for cell in self.slots.iter_mut() {
            if *cell > ordinal as i32 {
                *cell -= 1;
            }
        }
        value
    }

    /// Drops all entries and resets the slot table to its minimum size.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.slots = vec![EMPTY_SLOT; Self::slots_for(1)];
        self.tombstones = 0;
    }

    /// Key at insertion position `ordinal`; panics out of range.
    pub fn key_at(&self, ordinal: usize) -> &str {
        &self.keys[ordinal]
    }

    /// Value at insertion position `ordinal`; panics out of range.
    pub fn value_at(&self, ordinal: usize) -> &V {
        &self.values[ordinal]
    }

    pub fn value_at_mut(&mut self, ordinal: usize) -> &mut V {
        &mut self.values[ordinal]
    }

    /// Replaces the value at `ordinal`, returning the old one.
    pub fn set_value_at(&mut self, ordinal: usize, value: V) -> V {
        std::mem::replace(&mut self.values[ordinal], value)
    }

    pub(crate) fn value_slice(&self) -> &[V] {
        &self.values
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.keys.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.values.iter()
    }

    // staged spare-capacity growth for the ordered arrays: small maps grow
    // by 5, larger ones by 20% clamped to 10..=50
    fn reserve_for_push(&mut self) {
        if self.keys.len() == self.keys.capacity() {
            let grow = if self.keys.len() < 20 {
                5
            } else {
                (self.keys.len() / 5).clamp(10, 50)
            };
            self.keys.reserve_exact(grow);
            self.values.reserve_exact(grow);
        }
    }

    fn rehash(&mut self, target: usize) {
        let new_size = Self::slots_for(target);
        debug!(
            "ordered map rehash: {} live, {} tombstones, {} -> {} slots",
            self.keys.len(),
            self.tombstones,
            self.slots.len(),
            new_size
        );
        self.slots = vec![EMPTY_SLOT; new_size];
        self.tombstones = 0;
        for ordinal in 0..self.keys.len() {
            let slot = self.free_slot_for(&self.keys[ordinal]);
            self.slots[slot] = ordinal as i32;
        }
    }

    // first empty cell on the probe path; used only while rebuilding, when
    // no tombstones exist and the key is known absent
    fn free_slot_for(&self, key: &str) -> usize {
        let mask = self.slots.len() - 1;
        let hash = string_hash(key);
        let bits = self.slots.len().trailing_zeros();
        let mut idx = (hash & mask as i32) as usize;
        let step = {
            let s = (((hash as u32) >> bits) as usize) & mask;
            if s == 0 {
                1
            } else {
                s
            }
        };
        for _ in 0..=self.slots.len() {
            if self.slots[idx] == EMPTY_SLOT {
                return idx;
            }
            idx = (idx + step) & mask;
        }
        panic!("ordered map rebuild found no free slot; index is corrupt")
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.values == other.values
    }
}

//! # Ordered Map
//!
//! Key/value map whose entries live in one dense sequence in an explicit
//! order, with a hash index from key to position.
//!
//! - Key lookup is a hash probe, positional access is a plain index.
//! - Iteration follows position order, not hash order.
//! - Structural changes (remove, insert, reindex) rewrite the positions of
//!   every entry between the change point and the end, so they cost O(k).

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use crate::config::MemoryConfig;
use crate::error::check_index;
use crate::vec::DynVec;

/// A key/value pair stored in an [`OrderedMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

/// Direction of a position shift.
#[derive(Clone, Copy)]
enum Shift {
    Up,
    Down,
}

/// Order-preserving map with O(1) key and positional lookup.
///
/// # Example
///
/// ```rust
/// use tessera_memory::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.put("a", 1);
/// map.put("b", 2);
/// map.insert("c", 0, 3);
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["c", "a", "b"]);
/// assert_eq!(map.index(&"b"), Some(2));
/// ```
#[derive(Clone, Debug)]
pub struct OrderedMap<K, V, S = RandomState> {
    /// Key to position in `entries`.
    index: HashMap<K, usize, S>,
    /// Entries in position order.
    entries: DynVec<Entry<K, V>>,
}

impl<K, V> OrderedMap<K, V, RandomState> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty map with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            entries: DynVec::with_capacity(capacity),
        }
    }

    /// Creates an empty map sized by `config.map_capacity`.
    #[must_use]
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::with_capacity(config.map_capacity)
    }
}

impl<K, V, S: Default> Default for OrderedMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    /// Creates an empty map using `hasher` for the key index.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            index: HashMap::with_hasher(hasher),
            entries: DynVec::new(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in position order.
    ///
    /// The borrow ends before any further mutation of the map.
    #[inline]
    #[must_use]
    pub fn slice(&self) -> &[Entry<K, V>] {
        self.entries.as_slice()
    }

    /// Returns the entry at `position`.
    #[inline]
    #[must_use]
    pub fn entry_at(&self, position: usize) -> Option<&Entry<K, V>> {
        self.entries.get(position)
    }

    /// Iterates over entries in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    /// Iterates over keys in position order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Iterates over values in position order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|entry| &entry.value)
    }

    /// Iterates mutably over values in position order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|entry| &mut entry.value)
    }

    /// Removes every entry, keeping capacity.
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Returns the value under `key` and its position.
    pub fn value<Q>(&self, key: &Q) -> Option<(&V, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = *self.index.get(key)?;
        Some((&self.entries[position].value, position))
    }

    /// Returns the value under `key` mutably and its position.
    pub fn value_mut<Q>(&mut self, key: &Q) -> Option<(&mut V, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = *self.index.get(key)?;
        Some((&mut self.entries[position].value, position))
    }

    /// Returns the position of `key`.
    #[must_use]
    pub fn index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    /// Returns whether `key` is present.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Sets the value under `key`. An existing entry keeps its position, a
    /// new one is appended.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&position) = self.index.get(&key) {
            self.entries[position].value = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push(Entry { key, value });
        }
    }

    /// Removes `key`, returning its value and former position. Later entries
    /// move down by one.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(V, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = *self.index.get(key)?;
        let entry = self.remove_index(position);
        Some((entry.value, position))
    }

    /// Removes the entry at `position`. Later entries move down by one.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of range.
    #[track_caller]
    pub fn remove_index(&mut self, position: usize) -> Entry<K, V> {
        let len = self.entries.len();
        check_index(position, len);

        self.index.remove(&self.entries[position].key);
        self.shift(position + 1, len, Shift::Down);
        self.entries.remove(position)
    }

    /// Inserts `key` at `position`, moving entries at and after it up by one.
    /// An existing entry for `key` is removed first.
    ///
    /// # Panics
    ///
    /// Panics if `position` is past the end once the old entry is gone.
    #[track_caller]
    pub fn insert(&mut self, key: K, position: usize, value: V) {
        self.remove(&key);

        let len = self.entries.len();
        check_index(position, len + 1);

        self.shift(position, len, Shift::Up);
        self.index.insert(key.clone(), position);
        self.entries.insert(position, Entry { key, value });
    }

    /// Moves the entry at `old` to `new`, shifting the entries in between.
    ///
    /// # Panics
    ///
    /// Panics if either position is out of range.
    #[track_caller]
    pub fn reindex(&mut self, old: usize, new: usize) {
        if old == new {
            return;
        }

        let len = self.entries.len();
        check_index(old, len);
        check_index(new, len);

        if old < new {
            self.shift(old + 1, new + 1, Shift::Down);
        } else {
            self.shift(new, old, Shift::Up);
        }
        self.entries.move_item(old, new);
        if let Some(position) = self.index.get_mut(&self.entries[new].key) {
            *position = new;
        }
    }

    /// Re-keys the entry under `old` without moving it. An entry already
    /// under `new` is evicted first. Returns `false` if `old` is absent.
    pub fn rename<Q>(&mut self, old: &Q, new: K) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.index.contains_key(old) {
            return false;
        }
        if Borrow::<Q>::borrow(&new) == old {
            return true;
        }

        // evicting `new` may move `old` down, so look it up afterwards
        self.remove::<K>(&new);
        let Some(position) = self.index.remove(old) else {
            return false;
        };
        self.index.insert(new.clone(), position);
        self.entries[position].key = new;
        true
    }

    /// Returns whether the key index and the entry order agree.
    #[must_use]
    pub fn check_consistency(&self) -> bool {
        self.index.len() == self.entries.len()
            && self
                .entries
                .iter()
                .enumerate()
                .all(|(position, entry)| self.index.get(&entry.key) == Some(&position))
    }

    /// Moves the recorded position of every entry in `start..end`.
    fn shift(&mut self, start: usize, end: usize, shift: Shift) {
        for entry in &self.entries[start..end] {
            if let Some(position) = self.index.get_mut(&entry.key) {
                match shift {
                    Shift::Up => *position += 1,
                    Shift::Down => *position -= 1,
                }
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V, RandomState>
where
    K: Hash + Eq + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type Item = &'a Entry<K, V>;
    type IntoIter = std::slice::Iter<'a, Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs<K: Clone, V: Clone>(map: &OrderedMap<K, V>) -> Vec<(K, V)> {
        map.iter().map(|e| (e.key.clone(), e.value.clone())).collect()
    }

    fn abc() -> OrderedMap<&'static str, i32> {
        let mut map = OrderedMap::new();
        map.put("a", 1);
        map.put("b", 2);
        map.put("c", 3);
        map
    }

    #[test]
    fn test_map_put_and_insert() {
        let mut map = abc();
        assert_eq!(pairs(&map), [("a", 1), ("b", 2), ("c", 3)]);

        map.insert("d", 1, 4);
        assert_eq!(pairs(&map), [("a", 1), ("d", 4), ("b", 2), ("c", 3)]);
        assert_eq!(map.index(&"b"), Some(2));
        assert!(map.check_consistency());
    }

    #[test]
    fn test_map_put_keeps_position() {
        let mut map = abc();
        map.put("a", 10);
        assert_eq!(map.value(&"a"), Some((&10, 0)));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_map_insert_existing_key_moves_it() {
        let mut map = abc();
        map.insert("a", 2, 9);
        assert_eq!(pairs(&map), [("b", 2), ("c", 3), ("a", 9)]);
        assert!(map.check_consistency());
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn test_map_insert_past_end() {
        let mut map = abc();
        map.insert("z", 5, 0);
    }

    #[test]
    fn test_map_remove_shifts() {
        let mut map = abc();
        assert_eq!(map.remove(&"a"), Some((1, 0)));
        assert_eq!(map.index(&"b"), Some(0));
        assert_eq!(map.index(&"c"), Some(1));
        assert_eq!(map.remove(&"a"), None);

        let entry = map.remove_index(1);
        assert_eq!(entry, Entry { key: "c", value: 3 });
        assert_eq!(pairs(&map), [("b", 2)]);
        assert!(map.check_consistency());
    }

    #[test]
    fn test_map_reindex() {
        let mut map: OrderedMap<char, usize> = "abcde".chars().zip(0..).collect();

        map.reindex(1, 3);
        let keys: String = map.keys().collect();
        assert_eq!(keys, "acdbe");
        assert!(map.check_consistency());

        map.reindex(4, 0);
        let keys: String = map.keys().collect();
        assert_eq!(keys, "eacdb");
        assert!(map.check_consistency());

        map.reindex(2, 2);
        let keys: String = map.keys().collect();
        assert_eq!(keys, "eacdb");
    }

    #[test]
    fn test_map_rename() {
        let mut map = abc();
        let before = map.value(&"b").map(|(v, _)| *v);

        assert!(map.rename(&"b", "x"));
        assert_eq!(map.value(&"x").map(|(v, _)| *v), before);
        assert_eq!(map.index(&"x"), Some(1));
        assert!(!map.contains_key(&"b"));
        assert!(!map.rename(&"b", "y"));
        assert!(map.rename(&"x", "x"));
        assert!(map.check_consistency());
    }

    #[test]
    fn test_map_rename_evicts_earlier_entry() {
        let mut map = abc();
        // "a" sits before "c", so evicting it moves "c" down
        assert!(map.rename(&"c", "a"));
        assert_eq!(pairs(&map), [("b", 2), ("a", 3)]);
        assert!(map.check_consistency());
    }

    #[test]
    fn test_map_string_keys_borrowed_lookup() {
        let mut map: OrderedMap<String, u32> = OrderedMap::new();
        map.put("hp".to_owned(), 100);
        map.put("mp".to_owned(), 40);

        assert_eq!(map.index("mp"), Some(1));
        if let Some((value, _)) = map.value_mut("hp") {
            *value -= 10;
        }
        assert_eq!(map.value("hp"), Some((&90, 0)));
        assert!(map.rename("mp", "sp".to_owned()));
        assert_eq!(map.remove("sp"), Some((40, 1)));
    }

    #[test]
    fn test_map_entry_at_and_values_mut() {
        let mut map = abc();
        for value in map.values_mut() {
            *value *= 10;
        }
        assert_eq!(map.entry_at(1), Some(&Entry { key: "b", value: 20 }));
        assert_eq!(map.entry_at(3), None);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [10, 20, 30]);
        assert_eq!(map.slice().len(), 3);
    }

    #[test]
    fn test_map_clear() {
        let mut map = abc();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.index(&"a"), None);
        map.put("z", 0);
        assert_eq!(map.index(&"z"), Some(0));
    }
}

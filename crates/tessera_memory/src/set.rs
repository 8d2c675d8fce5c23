//! # Sorted Set
//!
//! Small set of ordered scalars kept in one sorted, duplicate-free sequence.
//! For small sets a linear scan beats both bisection and hashing, so lookup
//! switches strategy at a configurable length.

use crate::config::{MemoryConfig, DEFAULT_LINEAR_THRESHOLD};
use crate::vec::DynVec;

/// A set backed by a strictly ascending [`DynVec`].
///
/// # Example
///
/// ```rust
/// use tessera_memory::SortedSet;
///
/// let mut set = SortedSet::new();
/// assert!(set.insert(5));
/// assert!(!set.insert(5));
/// assert!(set.has(5));
/// assert!(set.remove(5));
/// assert!(set.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedSet<T> {
    items: DynVec<T>,
    /// Lengths below this use a linear scan.
    threshold: usize,
}

impl<T> Default for SortedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SortedSet<T> {
    /// Creates an empty set with the default linear-scan threshold.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(DEFAULT_LINEAR_THRESHOLD)
    }

    /// Creates an empty set that scans linearly while shorter than `threshold`.
    #[must_use]
    pub const fn with_threshold(threshold: usize) -> Self {
        Self {
            items: DynVec::new(),
            threshold,
        }
    }

    /// Creates an empty set using the configured threshold.
    #[must_use]
    pub const fn from_config(config: &MemoryConfig) -> Self {
        Self::with_threshold(config.set_linear_threshold)
    }

    /// Returns the linear-scan threshold.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes every element, keeping capacity.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the elements in ascending order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Iterates in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: Ord + Copy> SortedSet<T> {
    /// Returns whether `value` is in the set.
    #[must_use]
    pub fn has(&self, value: T) -> bool {
        self.find(value).is_ok()
    }

    /// Inserts `value`. Returns `false` if it was already present.
    pub fn insert(&mut self, value: T) -> bool {
        match self.find(value) {
            Ok(_) => false,
            Err(index) => {
                self.items.insert(index, value);
                true
            }
        }
    }

    /// Removes `value`. Returns `false` if it was absent.
    pub fn remove(&mut self, value: T) -> bool {
        match self.find(value) {
            Ok(index) => {
                self.items.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// `Ok(index)` of `value`, or `Err(insertion point)`.
    fn find(&self, value: T) -> Result<usize, usize> {
        let items = self.items.as_slice();
        if items.len() < self.threshold {
            for (i, &item) in items.iter().enumerate() {
                if item >= value {
                    return if item == value { Ok(i) } else { Err(i) };
                }
            }
            return Err(items.len());
        }
        self.items.bi_search(&value, Ord::cmp)
    }
}

impl<T: Ord + Copy> FromIterator<T> for SortedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a SortedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(values: &[i32]) -> SortedSet<i32> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_set_cases() {
        // (input, expected, insert 5 if true else remove 5)
        let cases: [(&[i32], &[i32], bool); 6] = [
            (&[5], &[], false),
            (&[], &[5], true),
            (&[0, 1, 4, 7, 8], &[0, 1, 4, 7, 8], false),
            (&[0, 1, 5, 7, 8], &[0, 1, 5, 7, 8], true),
            (&[0, 1, 7, 8], &[0, 1, 5, 7, 8], true),
            (&[0, 1, 5, 7, 8], &[0, 1, 7, 8], false),
        ];

        for (input, expected, insert) in cases {
            let mut set = set_of(input);
            if insert {
                set.insert(5);
            } else {
                set.remove(5);
            }
            assert_eq!(set.as_slice(), expected);
        }
    }

    #[test]
    fn test_set_linear_and_binary_agree() {
        let values = [40, 3, 17, 99, 3, 0, 64, 18, 17, 5, 77, 21, 2, 8, 90, 33, 1, 12, 50, 44];

        let mut linear = SortedSet::with_threshold(usize::MAX);
        let mut binary = SortedSet::with_threshold(1);
        for v in values {
            assert_eq!(linear.insert(v), binary.insert(v));
        }
        assert_eq!(linear.as_slice(), binary.as_slice());
        assert!(linear.as_slice().windows(2).all(|w| w[0] < w[1]));

        for v in [3, 4, 99, 100, 0] {
            assert_eq!(linear.has(v), binary.has(v));
            assert_eq!(linear.remove(v), binary.remove(v));
        }
        assert_eq!(linear.as_slice(), binary.as_slice());
    }

    #[test]
    fn test_set_crosses_threshold() {
        let mut set = SortedSet::new();
        for v in (0..40).rev() {
            assert!(set.insert(v * 2));
        }
        assert_eq!(set.len(), 40);
        assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]));
        assert!(set.has(78));
        assert!(!set.has(77));
        assert!(!set.insert(40));
    }

    #[test]
    fn test_set_from_config() {
        let config = MemoryConfig {
            set_linear_threshold: 4,
            ..MemoryConfig::default()
        };
        let set: SortedSet<u8> = SortedSet::from_config(&config);
        assert_eq!(set.threshold(), 4);
    }
}

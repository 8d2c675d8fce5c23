//! # Dynamic Sequence
//!
//! Growable array with shift-based insertion/removal, an iterative
//! quicksort and binary-search insertion.
//!
//! Every other container in this crate is built on top of [`DynVec`].

use std::cmp::Ordering;
use std::ops::{Deref, DerefMut};

use crate::error::{check_index, fault, MemoryError};

/// A growable sequence with explicit capacity/length distinction.
///
/// Growth reuses spare capacity without relocation whenever possible.
/// Elements removed by [`truncate`](Self::truncate), [`remove`](Self::remove)
/// and friends are dropped immediately, so a `DynVec` never keeps resources
/// of elements past its length alive.
///
/// Slice operations (`swap`, `reverse`, `last`, `iter`, indexing) come from
/// `Deref<Target = [T]>`.
///
/// # Example
///
/// ```rust
/// use tessera_memory::DynVec;
///
/// let mut v: DynVec<i32> = [3, 1, 2].into_iter().collect();
/// v.sort_by(|a, b| a < b);
/// assert_eq!(v.as_slice(), &[1, 2, 3]);
///
/// let at = v.bi_insert(0, tessera_memory::compare::three_way);
/// assert_eq!(at, 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DynVec<T> {
    items: Vec<T>,
}

impl<T> Default for DynVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynVec<T> {
    /// Creates an empty sequence without allocating.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty sequence with room for `capacity` elements.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the backing store holds without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns the elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Unwraps into the backing `Vec`.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Appends an element.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Removes the last element.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Removes the first element, shifting the rest down.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Removes and returns the element at `index`, shifting the tail down.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        check_index(index, self.items.len());
        self.items.remove(index)
    }

    /// Removes the elements in `start..end`.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or reaches past the end.
    #[track_caller]
    pub fn remove_range(&mut self, start: usize, end: usize) {
        if start > end || end > self.items.len() {
            fault(&MemoryError::OutOfRange {
                index: end.max(start),
                len: self.items.len(),
            });
        }
        self.items.drain(start..end);
    }

    /// Inserts `value` at `index`, shifting the tail up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) {
        check_index(index, self.items.len() + 1);
        self.items.insert(index, value);
    }

    /// Shrinks to `len` elements, dropping everything past it.
    ///
    /// Does nothing if `len` is not smaller than the current length.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Equivalent to `truncate(0)`. Capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Keeps only elements for which `filter` returns `true`, preserving order.
    pub fn retain_by<F>(&mut self, filter: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(filter);
    }

    /// Calls `f` with the index and a mutable reference of every element.
    pub fn for_each_indexed<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &mut T),
    {
        for (i, item) in self.items.iter_mut().enumerate() {
            f(i, item);
        }
    }

    /// Returns the first element matching `pred` along with its index.
    pub fn find<F>(&self, mut pred: F) -> Option<(usize, &T)>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().enumerate().find(|(_, item)| pred(item))
    }

    /// Moves the element at `old` to `new`, shifting everything in between by one.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[track_caller]
    pub fn move_item(&mut self, old: usize, new: usize) {
        let len = self.items.len();
        check_index(old, len);
        check_index(new, len);
        match old.cmp(&new) {
            Ordering::Less => self.items[old..=new].rotate_left(1),
            Ordering::Greater => self.items[new..=old].rotate_right(1),
            Ordering::Equal => {}
        }
    }

    /// Sorts in place with an iterative quicksort. `less(a, b)` returns
    /// whether `a` must come before `b`. Not stable.
    pub fn sort_by<F>(&mut self, less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut stack = Vec::new();
        self.sort_with_stack(&mut stack, less);
    }

    /// Same as [`sort_by`](Self::sort_by) but reuses `stack` as the
    /// auxiliary range stack, so repeated sorts do not allocate.
    ///
    /// The smaller partition is always processed first, which bounds the
    /// stack to O(log n) entries.
    pub fn sort_with_stack<F>(&mut self, stack: &mut Vec<(usize, usize)>, mut less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        stack.clear();
        if self.items.len() < 2 {
            return;
        }

        stack.push((0, self.items.len()));
        while let Some((lo, hi)) = stack.pop() {
            if hi - lo < 2 {
                continue;
            }

            // elements equal to the pivot are already in place
            let (equal_start, equal_end) = partition(&mut self.items[lo..hi], &mut less);
            let left = (lo, lo + equal_start);
            let right = (lo + equal_end, hi);
            if equal_start > hi - lo - equal_end {
                stack.push(left);
                stack.push(right);
            } else {
                stack.push(right);
                stack.push(left);
            }
        }
    }

    /// Binary search over a sequence sorted consistently with `cmp`.
    ///
    /// `cmp(element, value)` reports how a stored element relates to `value`.
    /// Returns `Ok(index)` of a matching element, or `Err(index)` where
    /// `value` would have to be inserted to keep the order.
    pub fn bi_search<F>(&self, value: &T, mut cmp: F) -> Result<usize, usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let (mut start, mut end) = (0, self.items.len());
        while start < end {
            let mid = start + (end - start) / 2;
            match cmp(&self.items[mid], value) {
                Ordering::Equal => return Ok(mid),
                Ordering::Greater => end = mid,
                Ordering::Less => start = mid + 1,
            }
        }
        Err(start)
    }

    /// Inserts `value` where [`bi_search`](Self::bi_search) places it and
    /// returns the position.
    pub fn bi_insert<F>(&mut self, value: T, cmp: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let index = self.bi_search(&value, cmp).unwrap_or_else(|i| i);
        self.items.insert(index, value);
        index
    }
}

impl<T: Clone> DynVec<T> {
    /// Inserts all of `values` at `index`, shifting the tail up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert_slice(&mut self, index: usize, values: &[T]) {
        check_index(index, self.items.len() + 1);
        self.items.splice(index..index, values.iter().cloned());
    }

    /// Overwrites elements starting at `index` with `values`. Values that
    /// would land past the end are ignored; the length never changes.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn rewrite(&mut self, values: &[T], index: usize) {
        check_index(index, self.items.len() + 1);
        let n = values.len().min(self.items.len() - index);
        self.items[index..index + n].clone_from_slice(&values[..n]);
    }
}

impl<T: Default> DynVec<T> {
    /// Grows the length by `amount` default elements, in place when the
    /// capacity allows it.
    pub fn extend_by(&mut self, amount: usize) {
        let len = self.items.len() + amount;
        self.items.resize_with(len, T::default);
    }

    /// Grows or shrinks to exactly `size` elements.
    pub fn resize(&mut self, size: usize) {
        self.items.resize_with(size, T::default);
    }
}

impl<T: Ord> DynVec<T> {
    /// Sorts ascending with [`sort_by`](Self::sort_by).
    pub fn sort(&mut self) {
        self.sort_by(|a, b| a < b);
    }
}

/// Three-way partition around a median-of-three pivot.
///
/// Returns `(start, end)` such that `v[..start]` sorts before the pivot,
/// `v[start..end]` is equivalent to it and `v[end..]` sorts after it.
fn partition<T, F>(v: &mut [T], less: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> bool,
{
    let last = v.len() - 1;
    let mid = last / 2;
    if less(&v[mid], &v[0]) {
        v.swap(mid, 0);
    }
    if less(&v[last], &v[0]) {
        v.swap(last, 0);
    }
    if less(&v[last], &v[mid]) {
        v.swap(last, mid);
    }
    v.swap(0, mid);

    // v[..lt] < pivot, v[lt..i] == pivot, v[gt..] > pivot; v[lt] is always a pivot copy
    let (mut lt, mut i, mut gt) = (0, 1, v.len());
    while i < gt {
        if less(&v[i], &v[lt]) {
            v.swap(lt, i);
            lt += 1;
            i += 1;
        } else if less(&v[lt], &v[i]) {
            gt -= 1;
            v.swap(i, gt);
        } else {
            i += 1;
        }
    }
    (lt, gt)
}

impl<T> Deref for DynVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for DynVec<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> From<Vec<T>> for DynVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for DynVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for DynVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for DynVec<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

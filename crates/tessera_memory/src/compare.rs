//! # Three-Way Comparators
//!
//! Helpers for [`DynVec::bi_search`](crate::DynVec::bi_search) and
//! [`DynVec::bi_insert`](crate::DynVec::bi_insert), which take a comparator
//! returning how a stored element relates to the searched value.

use std::cmp::Ordering;

/// Compares two scalars, treating incomparable values (NaN) as equal.
#[inline]
#[must_use]
pub fn three_way<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Inverts a comparator, for sequences kept in descending order.
#[inline]
pub fn reverse<T, F>(mut cmp: F) -> impl FnMut(&T, &T) -> Ordering
where
    F: FnMut(&T, &T) -> Ordering,
{
    move |a, b| cmp(a, b).reverse()
}

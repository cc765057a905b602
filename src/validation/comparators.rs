//! Comparison strategies used by the rule engine.
//!
//! All comparators are total and side-effect free. `None` (absent) is never
//! conflated with a present-but-empty value.

use std::collections::BTreeSet;

/// Exact equality for leaf values.
pub fn equal_value<T: PartialEq + ?Sized>(old: &T, new: &T) -> bool {
    old == new
}

/// An optional field may appear but never disappear.
///
/// Returns false only when `old` is present and `new` is absent.
pub fn one_way_presence<T>(old: Option<T>, new: Option<T>) -> bool {
    !(old.is_some() && new.is_none())
}

/// Whether every element of `old` also appears in `new`.
///
/// Both sides are compared as sets: order and duplicates are irrelevant.
pub fn is_subset_of<T: Ord>(old: &[T], new: &[T]) -> bool {
    let new: BTreeSet<&T> = new.iter().collect();
    old.iter().all(|item| new.contains(item))
}

/// Elements of `old` missing from `new`, sorted and de-duplicated.
pub fn missing_from<'a, T: Ord>(old: &'a [T], new: &[T]) -> Vec<&'a T> {
    let new: BTreeSet<&T> = new.iter().collect();
    old.iter()
        .filter(|item| !new.contains(item))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

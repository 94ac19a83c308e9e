//! Structural equality used to collapse identical host profiles.
//!
//! Lists of keyed items compare as unordered multisets: every element of one
//! side must have its own partner on the other side with the same key, and
//! the pair must itself be deeply equal. An absent optional list equals an empty one.

use std::collections::BTreeMap;

pub trait DeepEqual {
    fn deep_equal(&self, other: &Self) -> bool;
}

/// An element of a list that is compared as a set.
pub trait Keyed {
    type Key: PartialEq;

    fn key(&self) -> Self::Key;
}

/// Each element of `b` partners at most one element of `a`, so repeated
/// keys are counted.
pub fn keyed_set_eq<T: Keyed + DeepEqual>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        let key = x.key();
        let partner =
            (0..b.len()).find(|&i| !used[i] && key == b[i].key() && x.deep_equal(&b[i]));
        match partner {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

pub fn optional_keyed_set_eq<T: Keyed + DeepEqual>(a: &Option<Vec<T>>, b: &Option<Vec<T>>) -> bool {
    keyed_set_eq(a.as_deref().unwrap_or(&[]), b.as_deref().unwrap_or(&[]))
}

/// Order-insensitive comparison of string lists, duplicates counted.
pub fn unordered_eq(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

pub fn optional_unordered_eq(a: &Option<Vec<String>>, b: &Option<Vec<String>>) -> bool {
    unordered_eq(a.as_deref().unwrap_or(&[]), b.as_deref().unwrap_or(&[]))
}

/// Maps of lists whose values compare as multisets per key.
pub fn multimap_eq(a: &BTreeMap<String, Vec<String>>, b: &BTreeMap<String, Vec<String>>) -> bool {
    a.len() == b.len()
        && a.iter().all(|(k, va)| match b.get(k) {
            Some(vb) => unordered_eq(va, vb),
            None => false,
        })
}

pub fn optional_deep_eq<T: DeepEqual>(a: &Option<T>, b: &Option<T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.deep_equal(b),
        (None, None) => true,
        _ => false,
    }
}

/// Leaf types whose structural equality is plain field equality.
macro_rules! deep_equal_by_eq {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::models::equality::DeepEqual for $t {
                fn deep_equal(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

pub(crate) use deep_equal_by_eq;

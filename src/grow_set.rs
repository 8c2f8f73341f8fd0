use std::collections::BTreeSet;

use crate::crdt::Crdt;

/// A grow-only set (G-Set): elements can be added but never removed.
///
/// Elements must be `Ord` — this crate stores them in a `BTreeSet` rather
/// than a hash set so that iteration order is deterministic, which matters
/// when a `GrowSet<Operation<T>>` backs a [`crate::sequence::Sequence`]'s
/// operation log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowSet<T: Ord> {
    elements: BTreeSet<T>,
}

impl<T: Ord> GrowSet<T> {
    /// Create a new, empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: BTreeSet::new(),
        }
    }

    /// Insert an element. Returns `true` if it was newly inserted.
    pub fn add(&mut self, value: T) -> bool {
        self.elements.insert(value)
    }

    /// The number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the set has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }

    /// Look up the element that compares equal to `value`, if any.
    ///
    /// Useful when `T`'s `Eq`/`Ord` implementation considers two
    /// differently-populated values equal (as [`crate::operation::Operation`]
    /// does, by `owner` alone) and the caller wants to inspect what's
    /// actually stored under that key.
    #[must_use]
    pub fn get(&self, value: &T) -> Option<&T> {
        self.elements.get(value)
    }

    /// Whether the set contains an element equal to `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.elements.contains(value)
    }
}

impl<T: Ord + Clone> GrowSet<T> {
    /// Elements present in `self` but not in `other`, compared by `Eq`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Vec<T> {
        self.elements
            .iter()
            .filter(|e| !other.elements.contains(e))
            .cloned()
            .collect()
    }
}

impl<T: Ord + Clone> Crdt for GrowSet<T> {
    /// Union `other`'s elements into `self`.
    fn merge(&mut self, other: &Self) {
        self.elements.extend(other.elements.iter().cloned());
    }
}

impl<T: Ord> Default for GrowSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for GrowSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: BTreeSet::from_iter(iter),
        }
    }
}

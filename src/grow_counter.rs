use std::collections::BTreeMap;

use crate::crdt::Crdt;
use crate::error::NotebookError;
use crate::replica::ReplicaId;

/// A grow-only counter (G-Counter), one slot per replica.
///
/// A `GrowCounter` is bound to a single [`ReplicaId`] at construction; only
/// that slot is ever written locally via [`GrowCounter::add`]. Other slots
/// are populated exclusively through [`GrowCounter::merge`].
///
/// # Example
///
/// ```
/// use notebook_crdt::{Crdt, GrowCounter};
///
/// let mut c1 = GrowCounter::new("alice");
/// c1.add(2).unwrap();
///
/// let mut c2 = GrowCounter::new("bob");
/// c2.add(1).unwrap();
///
/// c1.merge(&c2);
/// assert_eq!(c1.get(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowCounter {
    replica: ReplicaId,
    slots: BTreeMap<ReplicaId, u64>,
}

impl GrowCounter {
    /// Create a new counter bound to `replica`, all slots zeroed.
    pub fn new(replica: impl Into<ReplicaId>) -> Self {
        let replica = replica.into();
        let mut slots = BTreeMap::new();
        slots.insert(replica.clone(), 0);
        Self { replica, slots }
    }

    /// Add `n` to this replica's own slot.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::InvalidArgument`] if `n` would overflow; the
    /// counter never accepts a negative amount because `n` is unsigned by
    /// construction — callers wanting to validate a signed input should
    /// check before calling.
    pub fn add(&mut self, n: u64) -> Result<(), NotebookError> {
        let slot = self.slots.entry(self.replica.clone()).or_insert(0);
        *slot = slot.checked_add(n).ok_or_else(|| NotebookError::InvalidArgument {
            reason: "counter overflow".to_string(),
        })?;
        Ok(())
    }

    /// The counter's value: the sum of every replica's slot.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.slots.values().sum()
    }

    /// This counter's bound replica id.
    #[must_use]
    pub fn replica(&self) -> &ReplicaId {
        &self.replica
    }

    /// The raw slot value for a specific replica, or zero if unseen.
    #[must_use]
    pub fn count_for(&self, replica: &ReplicaId) -> u64 {
        self.slots.get(replica).copied().unwrap_or(0)
    }
}

impl Crdt for GrowCounter {
    /// Merge `other`'s slots into `self`, taking the pointwise maximum.
    /// Always succeeds: a maximum of two existing slot values can never
    /// overflow what either slot already held.
    fn merge(&mut self, other: &Self) {
        for (replica, &count) in &other.slots {
            let entry = self.slots.entry(replica.clone()).or_insert(0);
            *entry = (*entry).max(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_counter_is_zero() {
        assert_eq!(GrowCounter::new("alice").get(), 0);
    }

    #[test]
    fn add_increases_value() {
        let mut c = GrowCounter::new("alice");
        c.add(5).unwrap();
        c.add(2).unwrap();
        assert_eq!(c.get(), 7);
    }

    #[test]
    fn merge_takes_pointwise_max() {
        let mut c1 = GrowCounter::new("alice");
        c1.add(3).unwrap();

        let mut c2 = GrowCounter::new("alice");
        c2.add(1).unwrap();

        c1.merge(&c2);
        assert_eq!(c1.get(), 3);
    }

    #[test]
    fn merge_sums_distinct_replicas() {
        let mut c1 = GrowCounter::new("alice");
        c1.add(1).unwrap();

        let mut c2 = GrowCounter::new("bob");
        c2.add(2).unwrap();

        c1.merge(&c2);
        assert_eq!(c1.get(), 3);
    }

    #[test]
    fn merge_is_commutative() {
        let mut c1 = GrowCounter::new("alice");
        c1.add(1).unwrap();
        let mut c2 = GrowCounter::new("bob");
        c2.add(2).unwrap();

        let mut left = c1.clone();
        left.merge(&c2);
        let mut right = c2.clone();
        right.merge(&c1);
        assert_eq!(left.get(), right.get());
    }

    #[test]
    fn merge_is_idempotent() {
        let mut c1 = GrowCounter::new("alice");
        c1.add(1).unwrap();
        let mut c2 = GrowCounter::new("bob");
        c2.add(2).unwrap();

        c1.merge(&c2);
        let once = c1.clone();
        c1.merge(&c2);
        assert_eq!(c1, once);
    }

    #[test]
    fn count_for_unknown_replica_is_zero() {
        let c = GrowCounter::new("alice");
        assert_eq!(c.count_for(&ReplicaId::new("bob")), 0);
    }
}

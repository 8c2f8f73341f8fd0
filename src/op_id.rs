use std::cmp::Ordering;
use std::fmt;

use crate::error::NotebookError;
use crate::replica::ReplicaId;

/// A totally ordered identifier for one local change: `(replica, tick)`.
///
/// Ordering is primarily by `tick` ascending, tie-broken by `replica`. No
/// two distinct operations in the merged universe should ever share an
/// `OpId` — if they do, it means two replicas chose the same [`ReplicaId`],
/// which [`OpId::is_earlier`] reports as [`NotebookError::ReplicaIdCollision`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpId {
    /// The replica that created the operation this id names.
    pub replica: ReplicaId,
    /// The replica-local tick at which the operation was created.
    pub tick: u64,
}

impl OpId {
    /// Construct a new `OpId`.
    pub fn new(replica: ReplicaId, tick: u64) -> Self {
        Self { replica, tick }
    }

    /// Returns `true` if `self` sorts strictly before `other`.
    ///
    /// Fails with [`NotebookError::ReplicaIdCollision`] if the two ids are
    /// equal but refer to operations that are nonetheless being compared as
    /// distinct — that can only happen if two replicas independently chose
    /// the same `(replica, tick)` pair.
    pub fn is_earlier(&self, other: &Self) -> Result<bool, NotebookError> {
        if self == other {
            return Err(NotebookError::ReplicaIdCollision {
                replica: self.replica.clone(),
                tick: self.tick,
            });
        }
        Ok(self.key() < other.key())
    }

    fn key(&self) -> (u64, &ReplicaId) {
        (self.tick, &self.replica)
    }
}

impl PartialOrd for OpId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.replica, self.tick)
    }
}

use crate::op_id::OpId;

/// The kind of change an [`Operation`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationType {
    /// Insert immediately before the target.
    InsertBefore,
    /// Insert immediately after the target.
    InsertAfter,
    /// Tombstone the target.
    Remove,
}

/// An immutable record of one change to a [`crate::sequence::Sequence`].
///
/// Equality and ordering are defined by `owner` alone, matching the set
/// semantics required by [`crate::grow_set::GrowSet`]: two operations with
/// the same owner are the same operation, regardless of what their
/// `action`/`target`/`payload` fields say. This lets a `GrowSet<Operation<T>>`
/// look up "the operation already known under this `OpId`" even when
/// comparing against a differently-populated probe value (see
/// [`crate::sequence::Sequence::merge`]'s replica-collision check).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operation<T> {
    /// The id of the operation that created this record.
    pub owner: OpId,
    /// What kind of change this operation describes.
    pub action: OperationType,
    /// The operation this one is positioned relative to. `None` is only
    /// legal for the very first insertion into an empty sequence.
    pub target: Option<OpId>,
    /// The value being inserted. Always `None` for `Remove`.
    pub payload: Option<T>,
}

impl<T> Operation<T> {
    /// Content equality: owner, action, target, and payload all match.
    /// Used to distinguish a harmless re-merge of the same operation from a
    /// genuine [`crate::error::NotebookError::ReplicaIdCollision`].
    pub fn same_content(&self, other: &Self) -> bool
    where
        T: PartialEq,
    {
        self.owner == other.owner
            && self.action == other.action
            && self.target == other.target
            && self.payload == other.payload
    }
}

impl<T> PartialEq for Operation<T> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
    }
}

impl<T> Eq for Operation<T> {}

impl<T> PartialOrd for Operation<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Operation<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.owner.cmp(&other.owner)
    }
}

impl<T> std::hash::Hash for Operation<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
    }
}

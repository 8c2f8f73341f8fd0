use crate::op_id::OpId;
use crate::replica::ReplicaId;

/// Errors surfaced by the notebook CRDT core.
///
/// `MissingTarget` and `ReplicaIdCollision` indicate an invariant violation
/// somewhere in the replicated history — a host should treat them as fatal
/// rather than attempt to route around them. `IndexOutOfRange` and
/// `InvalidArgument` are ordinary caller mistakes and are always
/// recoverable.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum NotebookError {
    /// A `GrowCounter::add` call was given a negative amount.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Human-readable explanation.
        reason: String,
    },

    /// A position passed to `Sequence::insert`/`remove` (or a `Cell`/`Notebook`
    /// façade method) fell outside the visible sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The visible length at the time of the call.
        len: usize,
    },

    /// `ObjectTree::remove` could not find the operation it was asked to
    /// tombstone. A well-formed operation log never triggers this, since
    /// merge applies operations in an order where every target has already
    /// been applied.
    #[error("missing target operation {target}")]
    MissingTarget {
        /// The `OpId` that could not be located in the tree.
        target: OpId,
    },

    /// Two distinct operations were observed sharing the same `OpId`,
    /// meaning two replicas independently chose the same `ReplicaId`. This
    /// is a configuration error, not a condition the CRDT can merge around.
    #[error("replica id collision: two operations share owner ({replica}, {tick})")]
    ReplicaIdCollision {
        /// The colliding replica id.
        replica: ReplicaId,
        /// The colliding tick.
        tick: u64,
    },

    /// `merge` was given a value that is not the same CRDT kind.
    #[error("incompatible merge: expected {expected}")]
    IncompatibleMerge {
        /// The CRDT kind that was expected.
        expected: &'static str,
    },
}

use crate::crdt::Crdt;
use crate::error::NotebookError;
use crate::grow_counter::GrowCounter;
use crate::grow_set::GrowSet;
use crate::object_tree::ObjectTree;
use crate::op_id::OpId;
use crate::operation::{Operation, OperationType};
use crate::replica::ReplicaId;

/// Lets a payload type merge itself in place when two replicas have both
/// produced further state for the *same* logical element.
///
/// Every element in a [`Sequence`] is created exactly once (by whichever
/// `append`/`insert` call first produces its `OpId`), but its payload can
/// keep evolving locally after that — a [`crate::cell::Cell`] stored inside
/// a [`crate::notebook::Notebook`]'s sequence is a live CRDT in its own
/// right. `Sequence::merge` finds each pair of entries that share an owner
/// on both sides and recurses into `RecursiveMerge` to propagate that live
/// content, rather than relying on the operation log, whose recorded
/// payload for a given owner is frozen at creation time and never reflects
/// later edits.
///
/// Leaf payloads with no further internal state (like `char`) never reach
/// this path with differing content: the same owner always carries the same
/// value on both sides, since a leaf's value is fixed at creation and
/// nothing ever mutates it in place. A `false` return is reserved for a
/// payload that discovers a genuine, unreconcilable conflict while merging
/// its own internal state — `Sequence::merge` reports that as
/// [`NotebookError::ReplicaIdCollision`].
pub trait RecursiveMerge {
    /// Merge `incoming` into `self`. Returns `false` if the two values are
    /// irreconcilable (only possible for leaf types with no CRDT state of
    /// their own).
    fn recursive_merge(&mut self, incoming: &Self) -> bool;
}

impl RecursiveMerge for char {
    fn recursive_merge(&mut self, incoming: &Self) -> bool {
        self == incoming
    }
}

/// A replicated, ordered sequence of `T`, supporting concurrent insertion,
/// removal, and position-based access.
///
/// Built from the same three primitives as every other CRDT in this crate:
/// a [`GrowCounter`] for the replica's logical clock, a [`GrowSet`] holding
/// the append-only log of every [`Operation`] this replica has applied or
/// learned of, and an [`ObjectTree`] that materializes the log into an
/// ordered, tombstone-aware view.
///
/// A `Sequence` is not internally synchronized; a host sharing one across
/// threads (an editing thread and a network-receive thread, say) must wrap
/// it in a `Mutex` or `RwLock` itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence<T> {
    replica: ReplicaId,
    clock: GrowCounter,
    operations: GrowSet<Operation<T>>,
    tree: ObjectTree<T>,
}

impl<T> Sequence<T> {
    /// Create an empty sequence bound to `replica`.
    pub fn new(replica: impl Into<ReplicaId>) -> Self {
        let replica = replica.into();
        Self {
            clock: GrowCounter::new(replica.clone()),
            operations: GrowSet::new(),
            tree: ObjectTree::new(),
            replica,
        }
    }

    /// This sequence's bound replica id.
    #[must_use]
    pub fn replica_id(&self) -> &ReplicaId {
        &self.replica
    }

    /// Rebind which replica id labels this sequence's *future* local
    /// operations, without touching its history.
    ///
    /// A [`crate::cell::Cell`]'s internal `Sequence<char>` is stamped with
    /// its creator's replica id at construction; when a different replica
    /// later edits that same cell, its local edits must carry its own
    /// identity so two replicas independently editing the same cell never
    /// label their operations with the same `(replica, tick)` pair. See
    /// [`crate::notebook::Notebook::update_cell`].
    pub(crate) fn rebind_replica(&mut self, replica: ReplicaId) {
        self.replica = replica;
    }

    /// The number of visible (non-tombstoned) elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.iter().filter(|e| !e.tombstone).count()
    }

    /// Whether the sequence has no visible elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The total number of operations this sequence has recorded, visible
    /// or tombstoned. Monotonically non-decreasing across `merge` calls —
    /// useful for asserting the CRDT growth property directly rather than
    /// through the visible length, which shrinks on `remove`.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// The `OpId` owning each visible element, in order.
    ///
    /// Lets a caller holding a `Sequence<T>` look up and mutate a specific
    /// element's live payload via [`Sequence::payload_mut`] without needing
    /// `T: Clone` the way [`Sequence::get`] does (see
    /// [`crate::notebook::Notebook::update_cell`]).
    #[must_use]
    pub fn get_owners(&self) -> Vec<OpId> {
        self.tree
            .iter()
            .filter(|e| !e.tombstone)
            .map(|e| e.operation.owner.clone())
            .collect()
    }

    fn next_owner(&mut self) -> Result<OpId, NotebookError> {
        self.clock.add(1)?;
        Ok(OpId::new(self.replica.clone(), self.clock.get()))
    }

    fn record(
        &mut self,
        action: OperationType,
        target: Option<OpId>,
        payload: Option<T>,
    ) -> Result<OpId, NotebookError>
    where
        T: Clone,
    {
        let owner = self.next_owner()?;
        let operation = Operation {
            owner: owner.clone(),
            action,
            target,
            payload,
        };
        self.tree.apply(operation.clone())?;
        self.operations.add(operation);
        tracing::trace!(%owner, "applied local operation");
        Ok(owner)
    }

    /// Append `value` to the end of the visible sequence.
    ///
    /// Targets the last *visible* entry with `InsertAfter`, so that
    /// appending after a deleted tail still lands next to whatever is
    /// actually visible rather than next to a tombstone. If nothing is
    /// visible (the tree is empty, or every entry has been removed), falls
    /// back to `InsertBefore` targeting the very first entry, or to a fresh
    /// root if the tree is empty outright.
    pub fn append(&mut self, value: T) -> Result<OpId, NotebookError>
    where
        T: Clone,
    {
        let last_visible = self
            .tree
            .iter()
            .filter(|e| !e.tombstone)
            .last()
            .map(|e| e.operation.owner.clone());
        match last_visible {
            Some(target) => self.record(OperationType::InsertAfter, Some(target), Some(value)),
            None => {
                let first = self.tree.iter().next().map(|e| e.operation.owner.clone());
                match first {
                    Some(target) => {
                        self.record(OperationType::InsertBefore, Some(target), Some(value))
                    }
                    None => self.record(OperationType::InsertBefore, None, Some(value)),
                }
            }
        }
    }

    /// Append every item in `values`, in order.
    pub fn append_many(
        &mut self,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Vec<OpId>, NotebookError>
    where
        T: Clone,
    {
        values.into_iter().map(|v| self.append(v)).collect()
    }

    /// Insert `value` at `position` in the visible sequence, shifting
    /// everything at or after `position` one place to the right.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::IndexOutOfRange`] if `position` is greater
    /// than the current length.
    pub fn insert(&mut self, position: usize, value: T) -> Result<OpId, NotebookError>
    where
        T: Clone,
    {
        let owners = self.get_owners();
        if position > owners.len() {
            return Err(NotebookError::IndexOutOfRange {
                index: position,
                len: owners.len(),
            });
        }
        if position == owners.len() {
            return self.append(value);
        }
        let target = owners[position].clone();
        self.record(OperationType::InsertBefore, Some(target), Some(value))
    }

    /// Insert every item of `values` starting at `position`, preserving
    /// their relative order.
    pub fn insert_many(
        &mut self,
        position: usize,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Vec<OpId>, NotebookError>
    where
        T: Clone,
    {
        let mut ids = Vec::new();
        for (offset, value) in values.into_iter().enumerate() {
            ids.push(self.insert(position + offset, value)?);
        }
        Ok(ids)
    }

    /// Remove the element at `position` in the visible sequence.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::IndexOutOfRange`] if `position` is not a
    /// visible index.
    pub fn remove(&mut self, position: usize) -> Result<OpId, NotebookError>
    where
        T: Clone,
    {
        let owners = self.get_owners();
        let target = owners.get(position).cloned().ok_or(NotebookError::IndexOutOfRange {
            index: position,
            len: owners.len(),
        })?;
        self.record(OperationType::Remove, Some(target), None)
    }

    /// Remove `count` elements starting at `position`.
    pub fn remove_many(&mut self, position: usize, count: usize) -> Result<Vec<OpId>, NotebookError>
    where
        T: Clone,
    {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.remove(position)?);
        }
        Ok(ids)
    }

    /// The visible elements, in order.
    #[must_use]
    pub fn get(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.tree
            .iter()
            .filter(|e| !e.tombstone)
            .filter_map(|e| e.operation.payload.clone())
            .collect()
    }

    /// Borrow the live payload owned by `owner`, if still present (whether
    /// tombstoned or not).
    #[must_use]
    pub fn payload_mut(&mut self, owner: &OpId) -> Option<&mut T> {
        self.tree.payload_mut(owner)
    }

    /// Merge `other`'s operation log into `self`.
    ///
    /// Every operation `other` has that `self` doesn't is applied to
    /// `self`'s tree in `OpId` order; operations already known to `self` are
    /// skipped. An operation is considered "already known" purely by owner
    /// (matching [`GrowSet`]'s owner-only equality), so before skipping one
    /// this walks every operation `other` has — not just the ones a naive
    /// set difference would call new — and compares full content. The
    /// per-operation content recorded in the log is frozen at creation time
    /// (see [`Operation`]'s docs), so a mismatch under the same owner can
    /// only mean two replicas chose colliding ids
    /// ([`NotebookError::ReplicaIdCollision`]) — it is never how a payload's
    /// *live*, evolving content (e.g. a [`crate::cell::Cell`]'s text) gets
    /// propagated. Checking only the set-difference result would still miss
    /// this case, since `GrowSet::difference` treats two operations with the
    /// same owner as equal regardless of their other fields.
    ///
    /// Once the logs and trees agree on which elements exist, a final pass
    /// walks `self`'s and `other`'s *visible* entries in lockstep and, for
    /// every position whose `OpId` matches on both sides, recursively
    /// merges their live payloads ([`RecursiveMerge`]) — this is what lets a
    /// [`crate::cell::Cell`] nested in a [`crate::notebook::Notebook`]
    /// converge even though its creation operation's logged payload never
    /// changes. Positions are compared by owner, not blindly by index,
    /// because the two sides' visible sequences can still disagree in
    /// length or order at this point (a concurrent insert elsewhere in the
    /// sequence shifts everything after it); comparing misaligned positions
    /// would invent collisions between unrelated elements. A position
    /// present on only one side, or whose owner doesn't match its opposite
    /// number yet, is simply skipped — merge is idempotent, so a later
    /// round covers it once both sides' tree shapes agree.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::ReplicaIdCollision`] if two operations
    /// recorded under the same owner disagree (either at the log level, or
    /// because a shared element's live payload failed to reconcile), or
    /// whatever [`ObjectTree::apply`] returns for a malformed incoming log.
    #[tracing::instrument(level = "debug", skip(self, other), fields(replica = %self.replica))]
    pub fn merge(&mut self, other: &Self) -> Result<(), NotebookError>
    where
        T: Clone + PartialEq + RecursiveMerge,
    {
        self.clock.merge(&other.clock);

        let mut incoming = Vec::new();
        for op in other.operations.iter() {
            // Extract what's needed before releasing the borrow on
            // `self.operations`, so the conflicting case below is free to
            // call back into `&mut self`.
            let known = self
                .operations
                .get(op)
                .map(|existing| (existing.owner.clone(), existing.same_content(op)));
            match known {
                Some((_, true)) => continue,
                Some((owner, false)) => return Err(Self::collision(&owner)),
                None => incoming.push(op.clone()),
            }
        }

        incoming.sort_by(|a, b| a.owner.cmp(&b.owner));
        for op in incoming {
            self.tree.apply(op.clone())?;
            self.operations.add(op);
        }

        self.merge_visible_payloads(other)?;

        tracing::debug!(applied = self.operations.len(), "merge complete");
        Ok(())
    }

    fn collision(owner: &OpId) -> NotebookError {
        NotebookError::ReplicaIdCollision {
            replica: owner.replica.clone(),
            tick: owner.tick,
        }
    }

    /// Recursively merge `self`'s live payloads with `other`'s, position by
    /// position over the visible sequence, for every position whose owner
    /// matches on both sides. See [`Sequence::merge`]'s docs.
    fn merge_visible_payloads(&mut self, other: &Self) -> Result<(), NotebookError>
    where
        T: RecursiveMerge,
    {
        let self_owners = self.get_owners();
        let other_owners = other.get_owners();
        for (mine, theirs) in self_owners.iter().zip(other_owners.iter()) {
            if mine != theirs {
                continue;
            }
            let Some(their_payload) = other
                .tree
                .entry(theirs)
                .and_then(|entry| entry.operation.payload.as_ref())
            else {
                continue;
            };
            let Some(my_payload) = self.tree.payload_mut(mine) else {
                continue;
            };
            if !my_payload.recursive_merge(their_payload) {
                return Err(Self::collision(mine));
            }
        }
        Ok(())
    }
}

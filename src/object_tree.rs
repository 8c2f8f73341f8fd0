use crate::error::NotebookError;
use crate::op_id::OpId;
use crate::operation::{Operation, OperationType};

/// An [`Operation`] together with its tombstone bit.
///
/// Tombstones are never cleared; they preserve reference targets for
/// late-arriving operations (see [`ObjectTree`]'s module docs).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectEntry<T> {
    /// The operation this entry records.
    pub operation: Operation<T>,
    /// Whether this entry has been logically removed.
    pub tombstone: bool,
}

impl<T> ObjectEntry<T> {
    fn new(operation: Operation<T>) -> Self {
        Self {
            operation,
            tombstone: false,
        }
    }
}

/// One root of the [`ObjectTree`] forest: an entry whose operation targets
/// nothing (`target = None`), together with every entry inserted relative
/// to it, in tree order. `entries[0]` is always the root's own entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct ObjectRoot<T> {
    entries: Vec<ObjectEntry<T>>,
}

impl<T> ObjectRoot<T> {
    fn new(entry: ObjectEntry<T>) -> Self {
        Self {
            entries: vec![entry],
        }
    }

    fn owner(&self) -> &OpId {
        &self.entries[0].operation.owner
    }
}

/// A sorted forest of [`ObjectEntry`] values that places each new operation
/// relative to the OpId it targets.
///
/// Given any ordered application of operations where every target has
/// already been applied, the tree's in-order linearization (roots in stored
/// order, each root's entries in stored order) is a pure function of the
/// set of applied operations — not of the order they were applied in. This
/// is what lets [`crate::sequence::Sequence::merge`] apply a remote
/// replica's new operations in any topologically valid order and still
/// converge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectTree<T> {
    roots: Vec<ObjectRoot<T>>,
}

impl<T> ObjectTree<T> {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Apply `operation` to the tree, inserting or tombstoning as directed
    /// by its `action`.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::InvalidArgument`] if `operation` is a
    /// `Remove` carrying no target, or [`NotebookError::MissingTarget`] if
    /// that target is not present in the tree.
    pub fn apply(&mut self, operation: Operation<T>) -> Result<(), NotebookError> {
        match operation.action {
            OperationType::Remove => {
                let target = operation.target.clone().ok_or_else(|| NotebookError::InvalidArgument {
                    reason: "Remove operation must carry a target".to_string(),
                })?;
                self.tombstone(&target)
            }
            OperationType::InsertBefore => {
                self.insert_relative(operation, true);
                Ok(())
            }
            OperationType::InsertAfter => {
                self.insert_relative(operation, false);
                Ok(())
            }
        }
    }

    fn tombstone(&mut self, target: &OpId) -> Result<(), NotebookError> {
        for root in &mut self.roots {
            for entry in &mut root.entries {
                if &entry.operation.owner == target {
                    entry.tombstone = true;
                    return Ok(());
                }
            }
        }
        Err(NotebookError::MissingTarget {
            target: target.clone(),
        })
    }

    fn insert_relative(&mut self, operation: Operation<T>, before: bool) {
        let Some(target) = operation.target.clone() else {
            self.insert_root(ObjectEntry::new(operation));
            return;
        };

        let entry = ObjectEntry::new(operation);
        if before {
            self.insert_before(&target, entry);
        } else {
            self.insert_after(&target, entry);
        }
    }

    /// Insert a new root, keeping roots ordered by `OpId` ascending.
    fn insert_root(&mut self, entry: ObjectEntry<T>) {
        let index = self
            .roots
            .iter()
            .position(|root| entry.operation.owner < *root.owner())
            .unwrap_or(self.roots.len());
        self.roots.insert(index, ObjectRoot::new(entry));
    }

    /// Forward scan looking for either the target entry itself, or a
    /// sibling targeting the same anchor with a strictly greater `OpId`.
    /// Mirrors the RGA-style concurrent-insertion tie-break described in
    /// the tree's module docs.
    fn insert_before(&mut self, target: &OpId, entry: ObjectEntry<T>) {
        for root_idx in 0..self.roots.len() {
            for entry_idx in 0..self.roots[root_idx].entries.len() {
                let existing = &self.roots[root_idx].entries[entry_idx];
                if &existing.operation.owner == target {
                    self.roots[root_idx].entries.insert(entry_idx, entry);
                    return;
                }
                if existing.operation.target.as_ref() == Some(target)
                    && entry.operation.owner < existing.operation.owner
                {
                    self.roots[root_idx].entries.insert(entry_idx, entry);
                    return;
                }
            }
        }
        // Target not found (shouldn't happen for a causally-applied log):
        // fall in at the very end, matching the tree's append-on-miss
        // fallback rather than silently dropping the operation.
        if let Some(last) = self.roots.last_mut() {
            last.entries.push(entry);
        } else {
            self.roots.push(ObjectRoot::new(entry));
        }
    }

    /// Symmetric reverse scan for `InsertAfter`.
    fn insert_after(&mut self, target: &OpId, entry: ObjectEntry<T>) {
        for root_idx in (0..self.roots.len()).rev() {
            let len = self.roots[root_idx].entries.len();
            for entry_idx in (0..len).rev() {
                let existing = &self.roots[root_idx].entries[entry_idx];
                if &existing.operation.owner == target {
                    self.roots[root_idx].entries.insert(entry_idx + 1, entry);
                    return;
                }
                if existing.operation.target.as_ref() == Some(target)
                    && entry.operation.owner < existing.operation.owner
                {
                    self.roots[root_idx].entries.insert(entry_idx + 1, entry);
                    return;
                }
            }
        }
        if let Some(first) = self.roots.first_mut() {
            first.entries.insert(0, entry);
        } else {
            self.roots.push(ObjectRoot::new(entry));
        }
    }

    /// Iterate every entry (including tombstones) in tree order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectEntry<T>> {
        self.roots.iter().flat_map(|root| root.entries.iter())
    }

    /// Look up the entry owned by `owner`.
    #[must_use]
    pub fn entry(&self, owner: &OpId) -> Option<&ObjectEntry<T>> {
        self.iter().find(|entry| &entry.operation.owner == owner)
    }

    /// Borrow the live payload owned by `owner`, for in-place content edits
    /// that don't change the entry's position (see
    /// [`crate::sequence::Sequence::merge`]'s recursive-merge step).
    pub fn payload_mut(&mut self, owner: &OpId) -> Option<&mut T> {
        for root in &mut self.roots {
            for entry in &mut root.entries {
                if &entry.operation.owner == owner {
                    return entry.operation.payload.as_mut();
                }
            }
        }
        None
    }

    /// Whether the tree has any entries at all (tombstoned or not).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl<T> Default for ObjectTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replica::ReplicaId;

    fn op(replica: &str, tick: u64, action: OperationType, target: Option<(&str, u64)>, payload: Option<char>) -> Operation<char> {
        Operation {
            owner: OpId::new(ReplicaId::new(replica), tick),
            action,
            target: target.map(|(r, t)| OpId::new(ReplicaId::new(r), t)),
            payload,
        }
    }

    fn visible_payloads(tree: &ObjectTree<char>) -> Vec<char> {
        tree.iter()
            .filter(|e| !e.tombstone)
            .filter_map(|e| e.operation.payload)
            .collect()
    }

    #[test]
    fn first_insert_becomes_a_root() {
        let mut tree = ObjectTree::new();
        tree.apply(op("a", 1, OperationType::InsertBefore, None, Some('x')))
            .unwrap();
        assert_eq!(visible_payloads(&tree), vec!['x']);
    }

    #[test]
    fn concurrent_first_inserts_order_by_opid() {
        let mut tree = ObjectTree::new();
        tree.apply(op("b", 5, OperationType::InsertBefore, None, Some('y')))
            .unwrap();
        tree.apply(op("a", 2, OperationType::InsertBefore, None, Some('x')))
            .unwrap();
        // Roots are ordered by OpId ascending regardless of application order.
        assert_eq!(visible_payloads(&tree), vec!['x', 'y']);
    }

    #[test]
    fn insert_after_appends_next_to_target() {
        let mut tree = ObjectTree::new();
        tree.apply(op("a", 1, OperationType::InsertBefore, None, Some('a')))
            .unwrap();
        tree.apply(op("a", 2, OperationType::InsertAfter, Some(("a", 1)), Some('b')))
            .unwrap();
        assert_eq!(visible_payloads(&tree), vec!['a', 'b']);
    }

    #[test]
    fn remove_tombstones_target() {
        let mut tree = ObjectTree::new();
        tree.apply(op("a", 1, OperationType::InsertBefore, None, Some('a')))
            .unwrap();
        tree.apply(op("a", 2, OperationType::Remove, Some(("a", 1)), None))
            .unwrap();
        assert!(visible_payloads(&tree).is_empty());
    }

    #[test]
    fn remove_without_target_is_invalid_argument() {
        let mut tree: ObjectTree<char> = ObjectTree::new();
        let err = tree
            .apply(op("a", 1, OperationType::Remove, None, None))
            .unwrap_err();
        assert!(matches!(err, NotebookError::InvalidArgument { .. }));
    }

    #[test]
    fn remove_missing_target_errors() {
        let mut tree: ObjectTree<char> = ObjectTree::new();
        let err = tree
            .apply(op("a", 1, OperationType::Remove, Some(("a", 99)), None))
            .unwrap_err();
        assert!(matches!(err, NotebookError::MissingTarget { .. }));
    }

    #[test]
    fn concurrent_inserts_before_same_target_order_by_opid() {
        let mut tree = ObjectTree::new();
        tree.apply(op("a", 1, OperationType::InsertBefore, None, Some('T')))
            .unwrap();
        // Apply in ascending OpId order, matching how Sequence::merge
        // always applies a replica's new operations.
        tree.apply(op("b", 3, OperationType::InsertBefore, Some(("a", 1)), Some('Y')))
            .unwrap();
        tree.apply(op("c", 5, OperationType::InsertBefore, Some(("a", 1)), Some('X')))
            .unwrap();
        assert_eq!(visible_payloads(&tree), vec!['Y', 'X', 'T']);
    }
}

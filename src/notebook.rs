use crate::cell::Cell;
use crate::error::NotebookError;
use crate::op_id::OpId;
use crate::replica::ReplicaId;
use crate::sequence::Sequence;

/// A collaborative notebook: a replicated, ordered sequence of [`Cell`]s.
///
/// `Notebook` is a thin façade over `Sequence<Cell>` — creating, moving, and
/// removing cells goes through `Sequence`'s own operations, while a cell's
/// text evolves through its own independent `Sequence<char>` and converges
/// via [`Sequence::merge`]'s recursive-merge step when two replicas have
/// both edited the same cell.
///
/// Like every CRDT in this crate, `Notebook` is not internally
/// synchronized; a host sharing one between an editing thread and a
/// network-receive thread must hold it behind a `Mutex`/`RwLock` itself.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notebook {
    cells: Sequence<Cell>,
}

impl Notebook {
    /// An empty notebook bound to `replica`.
    pub fn new(replica: impl Into<ReplicaId>) -> Self {
        Self {
            cells: Sequence::new(replica),
        }
    }

    /// The notebook's replica id.
    #[must_use]
    pub fn replica_id(&self) -> &ReplicaId {
        self.cells.replica_id()
    }

    /// The number of visible cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the notebook has no visible cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Create a new, empty cell at `index` (or at the end, if `None`),
    /// stamped with this notebook's own replica id.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::IndexOutOfRange`] if `index` is given and
    /// out of range.
    pub fn create_cell(&mut self, index: Option<usize>) -> Result<OpId, NotebookError> {
        let cell = Cell::new(self.cells.replica_id().clone());
        match index {
            Some(position) => self.cells.insert(position, cell),
            None => self.cells.append(cell),
        }
    }

    /// Replace cell `index`'s text with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::IndexOutOfRange`] if `index` is not a
    /// visible cell.
    pub fn update_cell(&mut self, index: usize, text: &str) -> Result<(), NotebookError> {
        let cell = self.cell_mut(index)?;
        cell.update(text)
    }

    /// Remove the cell at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::IndexOutOfRange`] if `index` is not a
    /// visible cell.
    pub fn remove_cell(&mut self, index: usize) -> Result<OpId, NotebookError> {
        self.cells.remove(index)
    }

    /// Every visible cell's text, in order.
    #[must_use]
    pub fn get_cell_data(&self) -> Vec<String> {
        self.cells.get().iter().map(Cell::get_text).collect()
    }

    fn cell_mut(&mut self, index: usize) -> Result<&mut Cell, NotebookError> {
        let owner = self
            .cells
            .get_owners()
            .get(index)
            .cloned()
            .ok_or(NotebookError::IndexOutOfRange {
                index,
                len: self.cells.len(),
            })?;
        let replica = self.cells.replica_id().clone();
        let cell = self
            .cells
            .payload_mut(&owner)
            .expect("owner from get_owners always has a live payload");
        // A cell may have been created by a different replica; any further
        // edits made through *this* notebook must carry this replica's own
        // identity, not the creator's, or two replicas editing the same
        // cell would stamp operations under the same owner.
        cell.rebind_replica(replica);
        Ok(cell)
    }

    /// Merge `other`'s notebook state into `self`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Sequence::merge`] returns: a
    /// [`NotebookError::ReplicaIdCollision`] if the two histories disagree
    /// about a shared `OpId`, or a tree error from a malformed log.
    pub fn merge(&mut self, other: &Self) -> Result<(), NotebookError> {
        self.cells.merge(&other.cells)
    }
}

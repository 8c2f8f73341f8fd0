mod diff;

use crate::error::NotebookError;
use crate::replica::ReplicaId;
use crate::sequence::{RecursiveMerge, Sequence};

pub use diff::TextEdit;

/// One cell of a [`crate::notebook::Notebook`]: a replicated run of text.
///
/// Internally a [`Sequence<char>`]; every public method here either reads
/// the visible text or issues `Sequence` operations against it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    text: Sequence<char>,
}

impl Cell {
    /// An empty cell bound to `replica`.
    pub fn new(replica: impl Into<ReplicaId>) -> Self {
        Self {
            text: Sequence::new(replica),
        }
    }

    /// The cell's replica id.
    #[must_use]
    pub fn replica_id(&self) -> &ReplicaId {
        self.text.replica_id()
    }

    /// Rebind which replica id labels this cell's future local edits. See
    /// [`Sequence::rebind_replica`].
    pub(crate) fn rebind_replica(&mut self, replica: ReplicaId) {
        self.text.rebind_replica(replica);
    }

    /// The current visible text.
    #[must_use]
    pub fn get_text(&self) -> String {
        self.text.get().into_iter().collect()
    }

    /// The number of visible characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append `text` to the end of the cell.
    pub fn append_text(&mut self, text: &str) -> Result<(), NotebookError> {
        self.text.append_many(text.chars())?;
        Ok(())
    }

    /// Insert `text` at character position `position`.
    pub fn insert_text(&mut self, position: usize, text: &str) -> Result<(), NotebookError> {
        self.text.insert_many(position, text.chars())?;
        Ok(())
    }

    /// Remove `count` characters starting at `position`.
    pub fn remove_text(&mut self, position: usize, count: usize) -> Result<(), NotebookError> {
        self.text.remove_many(position, count)?;
        Ok(())
    }

    /// Replace the cell's entire visible text with `text`, expressed as the
    /// minimal diff between the current text and `text` rather than a
    /// wholesale clear-and-reinsert. Keeping unrelated characters' `OpId`s
    /// stable this way means a concurrent edit elsewhere in the cell still
    /// has somewhere to anchor to.
    #[tracing::instrument(level = "debug", skip(self, text), fields(replica = %self.replica_id()))]
    pub fn update(&mut self, text: &str) -> Result<(), NotebookError> {
        let current: Vec<char> = self.text.get();
        let target: Vec<char> = text.chars().collect();
        let edits = diff::diff(&current, &target);
        for edit in edits {
            match edit {
                TextEdit::Remove { position } => {
                    self.text.remove(position)?;
                }
                TextEdit::Insert { position, value } => {
                    self.text.insert(position, value)?;
                }
            }
        }
        Ok(())
    }

    /// Merge another replica's view of this same cell into `self`.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::ReplicaIdCollision`] if the two cells'
    /// histories disagree about what some shared `OpId` recorded.
    pub fn merge(&mut self, other: &Self) -> Result<(), NotebookError> {
        self.text.merge(&other.text)
    }
}

impl RecursiveMerge for Cell {
    fn recursive_merge(&mut self, incoming: &Self) -> bool {
        self.merge(incoming).is_ok()
    }
}

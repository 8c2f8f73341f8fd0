//! Convenient re-exports for common usage.
//!
//! ```
//! use notebook_crdt::prelude::*;
//! ```

pub use crate::Cell;
pub use crate::Crdt;
pub use crate::GrowCounter;
pub use crate::GrowSet;
pub use crate::Notebook;
pub use crate::NotebookError;
pub use crate::ObjectTree;
pub use crate::OpId;
pub use crate::Operation;
pub use crate::OperationType;
pub use crate::RecursiveMerge;
pub use crate::ReplicaId;
pub use crate::Sequence;
pub use crate::TextEdit;

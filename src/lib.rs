//! # notebook-crdt
//!
//! The CRDT core of a collaborative, peer-to-peer notebook: a family of
//! conflict-free replicated data types that converge to the same state no
//! matter what order concurrent edits are merged in, with no central
//! coordinator.
//!
//! ## Quick Start
//!
//! ```
//! use notebook_crdt::prelude::*;
//!
//! let mut alice = Notebook::new("alice");
//! alice.create_cell(None).unwrap();
//! alice.update_cell(0, "print('hi')").unwrap();
//!
//! let mut bob = Notebook::new("bob");
//! bob.merge(&alice).unwrap();
//! bob.create_cell(None).unwrap();
//! bob.update_cell(1, "print('bye')").unwrap();
//!
//! alice.merge(&bob).unwrap();
//! assert_eq!(alice.get_cell_data(), bob.get_cell_data());
//! ```
//!
//! ## Building blocks
//!
//! - [`GrowCounter`] / [`GrowSet`] — the two leaf CRDTs everything else is
//!   built from: grow-only counters and sets with trivial, always-correct
//!   merges.
//! - [`OpId`] / [`Operation`] — a totally ordered operation identifier and
//!   the operation record it labels.
//! - [`ObjectTree`] — materializes a growing operation log into an ordered,
//!   tombstone-aware tree.
//! - [`Sequence`] — a replicated ordered sequence built on top of the tree,
//!   supporting append/insert/remove at arbitrary positions.
//! - [`Cell`] — a `Sequence<char>` with a text-editing façade.
//! - [`Notebook`] — a `Sequence<Cell>` with a cell-editing façade.
//!
//! ## Feature flags
//!
//! - `serde` — derives `Serialize`/`Deserialize` on every public type, for
//!   hosts that need to persist or transmit replica state.
//!
//! ## Concurrency
//!
//! Every type in this crate is a plain, unsynchronized value type. A host
//! sharing a [`Notebook`] (or any of its pieces) between threads — for
//! instance an editing thread and a network-receive thread applying remote
//! merges — is responsible for wrapping it in a `Mutex` or `RwLock` itself.

mod cell;
mod crdt;
mod error;
mod grow_counter;
mod grow_set;
mod notebook;
mod object_tree;
mod op_id;
mod operation;
mod replica;
mod sequence;

pub mod prelude;

pub use cell::{Cell, TextEdit};
pub use crdt::Crdt;
pub use error::NotebookError;
pub use grow_counter::GrowCounter;
pub use grow_set::GrowSet;
pub use notebook::Notebook;
pub use object_tree::{ObjectEntry, ObjectTree};
pub use op_id::OpId;
pub use operation::{Operation, OperationType};
pub use replica::ReplicaId;
pub use sequence::{RecursiveMerge, Sequence};

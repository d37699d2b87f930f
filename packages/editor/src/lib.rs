//! # Notegraph Editor
//!
//! Write path for notegraph documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Area / Content / Shape / Property /  │
//! │        Link / Document                      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor                                      │
//! │  - managers: pure validate-and-build fns    │
//! │  - cascade: keep collections consistent     │
//! │  - store: commit, undo, commit hooks        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ graph (derived view) / workspace (storage)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Managers never mutate**: they take a document and return a new entity or an error
//! 2. **The store is the only writer**: every commit is stamped and snapshotted
//! 3. **Snapshots share entities**: unchanged `Arc`s are reused across versions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notegraph_editor::{DocumentStore, managers::content::ContentDraft};
//!
//! let mut store = DocumentStore::new(Document::default());
//! let area = store.create_area("Research")?;
//! let note = store.create_content(&area.id, "Reading list", ContentDraft::default())?;
//!
//! store.delete_area(&area.id); // removes the note and its links too
//! store.undo();                // and brings them back
//! ```

pub mod cascade;
pub mod errors;
pub mod managers;
pub mod store;
pub mod undo_stack;

pub use errors::{DeleteRejection, ValidationError};
pub use managers::DeletePlan;
pub use store::{CommitHook, DeleteOutcome, DocumentStore};
pub use undo_stack::{UndoStack, DEFAULT_UNDO_LIMIT};

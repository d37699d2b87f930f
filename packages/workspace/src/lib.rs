//! # Notegraph Workspace
//!
//! Everything around the document store that touches the outside world:
//!
//! ```text
//!                  ┌──────────────────────┐
//!   commit hook ──▶│ PersistenceScheduler │──▶ StorageManager ──▶ LocalAdapter
//!                  └──────────────────────┘
//!  DocumentStore
//!                  ┌──────────────────────┐
//!   every 15s   ──▶│ SyncReconciler       │◀─▶ CloudAdapter (users/<uid>/document)
//!                  └──────────────────────┘
//! ```

pub mod bound_file;
pub mod config;
pub mod errors;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod sync;

pub use bound_file::{BoundFile, BoundPayload, PayloadEncoding, BOUND_FILE_VERSION};
pub use config::{WorkspaceConfig, DEFAULT_CONFIG_NAME};
pub use errors::{BoundFileError, StorageError, SyncError, WorkspaceError};
pub use persistence::{PersistenceScheduler, DEFAULT_SAVE_DEBOUNCE};
pub use session::{lock_store, SharedStore, Workspace};
pub use storage::{CloudAdapter, LocalAdapter, MemoryAdapter, StorageAdapter, StorageManager};
pub use sync::{ApprovalStatus, AuthUser, SyncAction, SyncHandle, SyncReconciler, SyncStatus};

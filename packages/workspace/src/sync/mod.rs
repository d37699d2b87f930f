pub mod reconciler;
pub mod status;

pub use reconciler::{StatusListener, SyncHandle, SyncReconciler, DEFAULT_SYNC_INTERVAL};
pub use status::{ApprovalStatus, AuthUser, SyncAction, SyncStatus};

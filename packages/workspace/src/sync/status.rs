use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciler state.
///
/// `Idle → Syncing → Synced | Error`; `Offline` whenever nobody eligible is
/// signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Synced,
    Error,
    Offline,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "error",
            SyncStatus::Offline => "offline",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Approved,
    Pending,
    Rejected,
    #[default]
    Unchecked,
}

/// What the auth provider tells us about the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub approval_status: ApprovalStatus,
}

impl AuthUser {
    pub fn approved(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            approval_status: ApprovalStatus::Approved,
        }
    }

    pub fn can_sync(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Not signed in or not approved
    Skipped,
    Pushed,
    Pulled,
    Unchanged,
}

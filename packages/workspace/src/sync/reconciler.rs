//! # Sync reconciler
//!
//! Resolves divergence between the local document and the user's remote
//! copy by comparing `updated_at`; the newer side wins wholesale.
//!
//! ## Tick
//!
//! ```text
//! not approved ─────────────────────────────▶ Offline
//! remote absent ── local.updated_at > 0 ────▶ push
//! remote newer than local ──────────────────▶ pull (replace local)
//! local newer than last successful sync ────▶ push
//! otherwise ────────────────────────────────▶ nothing
//! ```
//!
//! A pull that lands after a later local edit overwrites that edit. There
//! is no compare-and-swap.

use super::status::{AuthUser, SyncAction, SyncStatus};
use crate::errors::SyncError;
use crate::session::{lock_store, SharedStore};
use crate::storage::{migrate, CloudAdapter, StorageAdapter};
use notegraph_model::{Clock, SystemClock, Timestamp};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Default period between ticks
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(15_000);

/// Called with every status change
pub type StatusListener = Arc<dyn Fn(SyncStatus) + Send + Sync>;

#[derive(Debug, Default)]
struct SyncState {
    status: SyncStatus,
    last_synced_at: Option<Timestamp>,
    last_error: Option<String>,
}

pub struct SyncReconciler {
    store: SharedStore,
    remote: Arc<dyn StorageAdapter>,
    auth: watch::Receiver<Option<AuthUser>>,
    clock: Arc<dyn Clock>,
    state: Mutex<SyncState>,
    listeners: Mutex<Vec<StatusListener>>,

    /// Held for the whole of a tick so forced and timed ticks never overlap
    running: tokio::sync::Mutex<()>,
}

impl SyncReconciler {
    pub fn new(
        store: SharedStore,
        remote: Arc<dyn StorageAdapter>,
        auth: watch::Receiver<Option<AuthUser>>,
    ) -> Self {
        Self {
            store,
            remote,
            auth,
            clock: Arc::new(SystemClock),
            state: Mutex::new(SyncState::default()),
            listeners: Mutex::new(Vec::new()),
            running: tokio::sync::Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn status(&self) -> SyncStatus {
        self.state().status
    }

    /// Start time of the last successful tick
    pub fn last_synced_at(&self) -> Option<Timestamp> {
        self.state().last_synced_at
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    pub fn add_listener(&self, listener: StatusListener) {
        self.listeners().push(listener);
    }

    /// Remove a listener previously added; matched by identity
    pub fn remove_listener(&self, listener: &StatusListener) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Run one reconciliation. Failures set [`SyncStatus::Error`] and are
    /// returned; they never touch the store.
    pub async fn tick(&self) -> Result<SyncAction, SyncError> {
        let _running = self.running.lock().await;

        let user = self.auth.borrow().clone();
        let Some(user) = user.filter(AuthUser::can_sync) else {
            self.set_status(SyncStatus::Offline);
            return Ok(SyncAction::Skipped);
        };

        let started_at = self.clock.now_millis();
        self.set_status(SyncStatus::Syncing);

        match self.reconcile(&user).await {
            Ok(action) => {
                {
                    let mut state = self.state();
                    state.last_synced_at = Some(started_at);
                    state.last_error = None;
                }
                info!(uid = %user.uid, action = ?action, "Sync complete");
                self.set_status(SyncStatus::Synced);
                Ok(action)
            }
            Err(e) => {
                error!(uid = %user.uid, error = %e, "Sync failed");
                self.state().last_error = Some(e.to_string());
                self.set_status(SyncStatus::Error);
                Err(e)
            }
        }
    }

    /// Out-of-band tick
    pub async fn force_sync(&self) -> Result<SyncAction, SyncError> {
        info!("Forced sync requested");
        self.tick().await
    }

    /// Drive ticks in the background: one as soon as an approved user is
    /// signed in, then every `interval`. Signing out stops the timer.
    pub fn spawn(self: &Arc<Self>, interval: Duration) -> SyncHandle {
        let reconciler = Arc::clone(self);
        let mut auth = self.auth.clone();

        let task = tokio::spawn(async move {
            loop {
                if !is_eligible(&auth) {
                    reconciler.set_status(SyncStatus::Offline);
                    if auth.changed().await.is_err() {
                        return;
                    }
                    continue;
                }

                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            // outcome is recorded in the status
                            let _ = reconciler.tick().await;
                        }
                        changed = auth.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            debug!("Auth changed, restarting sync timer");
                            break;
                        }
                    }
                }
            }
        });

        SyncHandle { task }
    }

    async fn reconcile(&self, user: &AuthUser) -> Result<SyncAction, SyncError> {
        let key = CloudAdapter::user_document_key(&user.uid);
        let local = Arc::clone(lock_store(&self.store).document());

        let action = match self.remote.get(&key).await? {
            None if local.updated_at > 0 => {
                self.remote.set(&key, &local).await?;
                SyncAction::Pushed
            }
            None => SyncAction::Unchanged,
            Some(remote) if remote.updated_at > local.updated_at => {
                let remote = migrate(remote)?;
                debug!(remote = remote.updated_at, local = local.updated_at, "Remote is newer");
                lock_store(&self.store).replace_document(remote);
                SyncAction::Pulled
            }
            Some(_) => {
                let last_synced_at = self.last_synced_at().unwrap_or(0);
                if local.updated_at > last_synced_at {
                    self.remote.set(&key, &local).await?;
                    SyncAction::Pushed
                } else {
                    SyncAction::Unchanged
                }
            }
        };

        Ok(action)
    }

    fn set_status(&self, status: SyncStatus) {
        {
            let mut state = self.state();
            if state.status == status {
                return;
            }
            state.status = status;
        }

        let listeners = self.listeners().clone();
        for listener in listeners {
            listener(status);
        }
    }

    fn state(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<StatusListener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_eligible(auth: &watch::Receiver<Option<AuthUser>>) -> bool {
    auth.borrow().as_ref().is_some_and(AuthUser::can_sync)
}

/// Background driver started by [`SyncReconciler::spawn`]. Dropping the
/// handle cancels it.
pub struct SyncHandle {
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

//! Workspace session: a document store wired to local storage, debounced
//! persistence and (optionally) remote sync.

use crate::config::WorkspaceConfig;
use crate::errors::{StorageError, WorkspaceError};
use crate::persistence::PersistenceScheduler;
use crate::storage::{CloudAdapter, LocalAdapter, StorageManager};
use crate::sync::{AuthUser, SyncReconciler};
use notegraph_editor::DocumentStore;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::info;

/// Store shared between the caller, the persistence hook and the reconciler
pub type SharedStore = Arc<Mutex<DocumentStore>>;

/// Lock the store. A panic while holding the lock leaves the store in a
/// committed state (writes commit atomically), so a poisoned lock is reused.
pub fn lock_store(store: &SharedStore) -> MutexGuard<'_, DocumentStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Workspace {
    root: PathBuf,
    config: WorkspaceConfig,
    store: SharedStore,
    storage: StorageManager,
    persistence: PersistenceScheduler,
}

impl Workspace {
    /// Load the local document under `root` and start debounced saving
    pub async fn open(root: impl Into<PathBuf>, config: WorkspaceConfig) -> Result<Self, WorkspaceError> {
        let root = root.into();
        let adapter = LocalAdapter::new(config.data_dir(&root));
        let storage = StorageManager::new(Arc::new(adapter), config.document_key.clone());

        let document = storage.load().await?;
        let mut store = DocumentStore::new(document).with_undo_limit(config.undo_limit);

        let persistence = PersistenceScheduler::spawn(storage.clone(), config.save_debounce());
        store.on_commit(persistence.hook());

        info!(root = %root.display(), "Opened workspace");

        Ok(Self {
            root,
            config,
            store: Arc::new(Mutex::new(store)),
            storage,
            persistence,
        })
    }

    /// Read the config from `root` and open it
    pub async fn open_dir(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let root = root.into();
        let config = WorkspaceConfig::load(&root)?;
        Self::open(root, config).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn lock(&self) -> MutexGuard<'_, DocumentStore> {
        lock_store(&self.store)
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    /// Reconciler against the configured remote directory
    pub fn reconciler(&self, auth: watch::Receiver<Option<AuthUser>>) -> Result<SyncReconciler, WorkspaceError> {
        let remote_dir = self.config.remote_dir(&self.root).ok_or(WorkspaceError::SyncDisabled)?;
        let remote = Arc::new(CloudAdapter::new(remote_dir));
        Ok(SyncReconciler::new(Arc::clone(&self.store), remote, auth))
    }

    /// Write any pending change now
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }

    /// Save the current document immediately, bypassing the debounce
    pub async fn save_now(&self) -> Result<(), StorageError> {
        let document = Arc::clone(self.lock().document());
        self.storage.save(&document).await
    }

    /// Flush and stop background saving
    pub async fn close(self) {
        self.persistence.flush().await;
        self.persistence.shutdown();
        info!(root = %self.root.display(), "Closed workspace");
    }
}

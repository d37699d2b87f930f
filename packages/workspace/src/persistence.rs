//! # Debounced persistence
//!
//! Commits arrive through the store's commit hook; a background task saves
//! the latest one once no further commit has arrived for the debounce delay
//! (trailing edge). A burst of edits costs one write.
//!
//! ```text
//! commit ─┐ commit ─┐ commit ─┐            quiet for `delay`
//!         ▼         ▼         ▼                  │
//!      [reset]   [reset]   [reset] ───────────── ▼ save(latest)
//! ```

use crate::storage::StorageManager;
use notegraph_editor::CommitHook;
use notegraph_model::Document;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

/// Default quiet period before a save
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(2000);

enum Command {
    Commit(Arc<Document>),
    Flush(oneshot::Sender<()>),
}

pub struct PersistenceScheduler {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl PersistenceScheduler {
    /// Start the save task on the current tokio runtime
    pub fn spawn(manager: StorageManager, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(manager, delay, rx));
        Self { tx, task }
    }

    /// Hook for [`notegraph_editor::DocumentStore::on_commit`]
    pub fn hook(&self) -> CommitHook {
        let tx = self.tx.clone();
        Box::new(move |document: &Arc<Document>| {
            // closed once the scheduler is shut down; nothing left to do
            let _ = tx.send(Command::Commit(Arc::clone(document)));
        })
    }

    /// Schedule a save of `document` as if it had just been committed
    pub fn schedule(&self, document: Arc<Document>) {
        let _ = self.tx.send(Command::Commit(document));
    }

    /// Save any pending document now and wait for it
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Command::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Cancel the timer; a pending save is dropped
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PersistenceScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(manager: StorageManager, delay: Duration, mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut pending: Option<Arc<Document>> = None;
    let timer = sleep(delay);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Commit(document)) => {
                    pending = Some(document);
                    timer.as_mut().reset(Instant::now() + delay);
                }
                Some(Command::Flush(done)) => {
                    if let Some(document) = pending.take() {
                        save(&manager, &document).await;
                    }
                    let _ = done.send(());
                }
                None => {
                    if let Some(document) = pending.take() {
                        save(&manager, &document).await;
                    }
                    debug!("Persistence channel closed");
                    break;
                }
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(document) = pending.take() {
                    save(&manager, &document).await;
                }
            }
        }
    }
}

/// Failures are logged; the store never sees them
async fn save(manager: &StorageManager, document: &Document) {
    match manager.save(document).await {
        Ok(()) => info!(updated_at = document.updated_at, "Persisted document"),
        Err(e) => error!(error = %e, "Failed to persist document"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryAdapter, StorageAdapter, DEFAULT_DOCUMENT_KEY};

    fn doc(updated_at: i64) -> Arc<Document> {
        Arc::new(Document {
            updated_at,
            ..Document::default()
        })
    }

    async fn stored(adapter: &MemoryAdapter) -> Option<i64> {
        adapter.get(DEFAULT_DOCUMENT_KEY).await.unwrap().map(|d| d.updated_at)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_saves_once() {
        let adapter = Arc::new(MemoryAdapter::new());
        let scheduler = PersistenceScheduler::spawn(
            StorageManager::new(adapter.clone(), DEFAULT_DOCUMENT_KEY),
            DEFAULT_SAVE_DEBOUNCE,
        );

        let hook = scheduler.hook();
        for i in 1..=5 {
            hook(&doc(i));
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        // last commit was 500ms ago
        assert_eq!(adapter.write_count(), 0);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(adapter.write_count(), 1);
        assert_eq!(stored(&adapter).await, Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_saves_immediately() {
        let adapter = Arc::new(MemoryAdapter::new());
        let scheduler = PersistenceScheduler::spawn(
            StorageManager::new(adapter.clone(), DEFAULT_DOCUMENT_KEY),
            DEFAULT_SAVE_DEBOUNCE,
        );

        scheduler.schedule(doc(9));
        scheduler.flush().await;
        assert_eq!(stored(&adapter).await, Some(9));

        // nothing pending any more
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(adapter.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_pending_save() {
        let adapter = Arc::new(MemoryAdapter::new());
        let scheduler = PersistenceScheduler::spawn(
            StorageManager::new(adapter.clone(), DEFAULT_DOCUMENT_KEY),
            DEFAULT_SAVE_DEBOUNCE,
        );

        scheduler.schedule(doc(1));
        scheduler.shutdown();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(adapter.write_count(), 0);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_failure_is_contained() {
        let adapter = Arc::new(MemoryAdapter::new());
        adapter.set_failing(true);
        let scheduler = PersistenceScheduler::spawn(
            StorageManager::new(adapter.clone(), DEFAULT_DOCUMENT_KEY),
            DEFAULT_SAVE_DEBOUNCE,
        );

        scheduler.schedule(doc(1));
        scheduler.flush().await;
        assert!(scheduler.is_running());

        adapter.set_failing(false);
        scheduler.schedule(doc(2));
        scheduler.flush().await;
        assert_eq!(stored(&adapter).await, Some(2));
    }
}

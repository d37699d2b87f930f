//! Reconciler behaviour against an in-memory remote

use notegraph_editor::managers::content::ContentDraft;
use notegraph_editor::DocumentStore;
use notegraph_model::{Document, ManualClock};
use notegraph_workspace::{
    lock_store, ApprovalStatus, AuthUser, CloudAdapter, MemoryAdapter, SharedStore, StorageAdapter, SyncAction,
    SyncReconciler, SyncStatus,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

const UID: &str = "u1";

fn key() -> String {
    CloudAdapter::user_document_key(UID)
}

fn doc_at(updated_at: i64) -> Document {
    Document {
        updated_at,
        ..Document::default()
    }
}

struct Fixture {
    store: SharedStore,
    remote: Arc<MemoryAdapter>,
    auth: watch::Sender<Option<AuthUser>>,
    reconciler: Arc<SyncReconciler>,
}

fn fixture(local: Document, user: Option<AuthUser>) -> Fixture {
    let store: SharedStore = Arc::new(Mutex::new(DocumentStore::with_clock(
        local,
        Arc::new(ManualClock::new(50_000)),
    )));
    let remote = Arc::new(MemoryAdapter::new());
    let (auth, rx) = watch::channel(user);
    let reconciler = Arc::new(
        SyncReconciler::new(Arc::clone(&store), remote.clone(), rx).with_clock(Arc::new(ManualClock::new(3_000))),
    );

    Fixture {
        store,
        remote,
        auth,
        reconciler,
    }
}

#[tokio::test]
async fn test_local_newer_is_pushed() {
    let f = fixture(doc_at(2000), Some(AuthUser::approved(UID)));
    f.remote.set(&key(), &doc_at(1000)).await.unwrap();

    let action = f.reconciler.tick().await.unwrap();

    assert_eq!(action, SyncAction::Pushed);
    assert_eq!(f.remote.get(&key()).await.unwrap().unwrap().updated_at, 2000);
    assert_eq!(f.reconciler.status(), SyncStatus::Synced);
    assert_eq!(f.reconciler.last_synced_at(), Some(3_000));
}

#[tokio::test]
async fn test_remote_newer_is_pulled() {
    let f = fixture(doc_at(2000), Some(AuthUser::approved(UID)));
    f.remote.set(&key(), &doc_at(9000)).await.unwrap();

    let action = f.reconciler.tick().await.unwrap();

    assert_eq!(action, SyncAction::Pulled);
    let store = lock_store(&f.store);
    assert_eq!(store.document().updated_at, 9000);
    // a pull is not an undoable edit
    assert!(!store.can_undo());
}

#[tokio::test]
async fn test_fresh_document_is_not_pushed() {
    let f = fixture(doc_at(0), Some(AuthUser::approved(UID)));

    let action = f.reconciler.tick().await.unwrap();

    assert_eq!(action, SyncAction::Unchanged);
    assert!(f.remote.get(&key()).await.unwrap().is_none());
    assert_eq!(f.remote.write_count(), 0);
}

#[tokio::test]
async fn test_missing_remote_gets_local() {
    let f = fixture(doc_at(1234), Some(AuthUser::approved(UID)));

    assert_eq!(f.reconciler.tick().await.unwrap(), SyncAction::Pushed);
    assert_eq!(f.remote.get(&key()).await.unwrap().unwrap().updated_at, 1234);
}

#[tokio::test]
async fn test_local_older_than_last_sync_is_left_alone() {
    let f = fixture(doc_at(2000), Some(AuthUser::approved(UID)));
    f.remote.set(&key(), &doc_at(2000)).await.unwrap();

    // first tick pushes (never synced before); last sync is now 3000
    assert_eq!(f.reconciler.tick().await.unwrap(), SyncAction::Pushed);
    assert_eq!(f.reconciler.tick().await.unwrap(), SyncAction::Unchanged);
    assert_eq!(f.remote.write_count(), 2);
}

#[tokio::test]
async fn test_unapproved_user_is_offline() {
    let pending = AuthUser {
        uid: UID.to_string(),
        approval_status: ApprovalStatus::Pending,
    };
    let f = fixture(doc_at(2000), Some(pending));

    assert_eq!(f.reconciler.tick().await.unwrap(), SyncAction::Skipped);
    assert_eq!(f.reconciler.status(), SyncStatus::Offline);
    assert_eq!(f.remote.write_count(), 0);

    f.auth.send_replace(None);
    assert_eq!(f.reconciler.tick().await.unwrap(), SyncAction::Skipped);
}

#[tokio::test]
async fn test_remote_failure_sets_error_status() {
    let f = fixture(doc_at(2000), Some(AuthUser::approved(UID)));
    f.remote.set_failing(true);

    assert!(f.reconciler.tick().await.is_err());
    assert_eq!(f.reconciler.status(), SyncStatus::Error);
    assert!(f.reconciler.last_error().is_some());
    assert_eq!(f.reconciler.last_synced_at(), None);
    // the store's own error field is untouched
    assert_eq!(lock_store(&f.store).current_error(), None);

    f.remote.set_failing(false);
    assert_eq!(f.reconciler.force_sync().await.unwrap(), SyncAction::Pushed);
    assert_eq!(f.reconciler.last_error(), None);
}

#[tokio::test]
async fn test_listeners_see_transitions_until_removed() {
    let f = fixture(doc_at(2000), Some(AuthUser::approved(UID)));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let listener: notegraph_workspace::sync::StatusListener = Arc::new(move |status: SyncStatus| {
        sink.lock().unwrap().push(status);
    });
    f.reconciler.add_listener(Arc::clone(&listener));

    f.reconciler.tick().await.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![SyncStatus::Syncing, SyncStatus::Synced]);

    assert!(f.reconciler.remove_listener(&listener));
    assert!(!f.reconciler.remove_listener(&listener));
    f.reconciler.tick().await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_driver_ticks_immediately_then_on_interval() {
    let f = fixture(doc_at(0), Some(AuthUser::approved(UID)));
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ticks);
    f.reconciler.add_listener(Arc::new(move |status: SyncStatus| {
        if status == SyncStatus::Syncing {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }));

    let handle = f.reconciler.spawn(Duration::from_millis(15_000));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    // a local edit is pushed on the next interval
    {
        let mut store = lock_store(&f.store);
        let area = store.create_area("Notes").unwrap();
        store.create_content(&area.id, "Draft", ContentDraft::default()).unwrap();
    }
    tokio::time::sleep(Duration::from_millis(15_000)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);
    assert!(f.remote.get(&key()).await.unwrap().is_some());

    // signing out stops the timer
    f.auth.send_replace(None);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(f.reconciler.status(), SyncStatus::Offline);
    tokio::time::sleep(Duration::from_millis(60_000)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);

    // signing back in ticks straight away
    f.auth.send_replace(Some(AuthUser::approved(UID)));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);

    handle.shutdown();
    tokio::time::sleep(Duration::from_millis(60_000)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

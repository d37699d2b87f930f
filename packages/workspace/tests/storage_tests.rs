//! Workspaces on disk: persistence, legacy documents and two devices
//! sharing one remote directory

use notegraph_editor::managers::content::ContentDraft;
use notegraph_model::SCHEMA_VERSION;
use notegraph_workspace::{AuthUser, SyncAction, Workspace, WorkspaceConfig, DEFAULT_CONFIG_NAME};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

fn config_with_remote(remote: &std::path::Path) -> WorkspaceConfig {
    WorkspaceConfig {
        remote_dir: Some(remote.display().to_string()),
        ..WorkspaceConfig::default()
    }
}

#[tokio::test]
async fn test_document_file_is_camel_case_with_null_graph() {
    let dir = TempDir::new().unwrap();
    let workspace = Workspace::open(dir.path(), WorkspaceConfig::default()).await.unwrap();
    {
        let mut store = workspace.lock();
        let area = store.create_area("Notes").unwrap();
        store.create_content(&area.id, "Draft", ContentDraft::default()).unwrap();
    }
    workspace.close().await;

    let path = dir.path().join(".notegraph").join("notegraph-document.json");
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

    assert!(json["graph"].is_null());
    assert_eq!(json["version"], SCHEMA_VERSION);
    assert_eq!(json["contents"][0]["status"], "OPEN");
    assert!(json["areas"][0]["contentIds"].is_array());
    assert!(json["updatedAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_legacy_document_index_is_rebuilt() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join(".notegraph");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("notegraph-document.json"),
        r#"{
            "version": 1,
            "areas": [{ "id": "a1", "name": "Notes", "contentIds": ["stale"], "createdAt": 1, "updatedAt": 1 }],
            "contents": [{ "id": "c1", "areaId": "a1", "title": "Kept", "createdAt": 1, "updatedAt": 1 }],
            "links": [],
            "graph": { "nodes": [] },
            "createdAt": 1,
            "updatedAt": 5
        }"#,
    )
    .unwrap();

    let workspace = Workspace::open(dir.path(), WorkspaceConfig::default()).await.unwrap();
    let doc = Arc::clone(workspace.lock().document());

    assert_eq!(doc.version, SCHEMA_VERSION);
    assert_eq!(doc.areas[0].content_ids, vec!["c1".to_string()]);
    assert!(doc.graph.is_none());
    assert_eq!(doc.updated_at, 5);
}

#[tokio::test]
async fn test_config_file_is_honoured() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(DEFAULT_CONFIG_NAME),
        r#"{ "dataDir": "store", "documentKey": "notes" }"#,
    )
    .unwrap();

    let workspace = Workspace::open_dir(dir.path()).await.unwrap();
    workspace.lock().create_area("Notes").unwrap();
    workspace.close().await;

    assert!(dir.path().join("store").join("notes.json").is_file());
}

#[tokio::test]
async fn test_two_devices_converge_through_remote() {
    let remote = TempDir::new().unwrap();
    let laptop_dir = TempDir::new().unwrap();
    let phone_dir = TempDir::new().unwrap();
    let (_auth, auth_rx) = watch::channel(Some(AuthUser::approved("u1")));

    let laptop = Workspace::open(laptop_dir.path(), config_with_remote(remote.path()))
        .await
        .unwrap();
    {
        let mut store = laptop.lock();
        let area = store.create_area("Notes").unwrap();
        store.create_content(&area.id, "From laptop", ContentDraft::default()).unwrap();
    }
    let laptop_sync = laptop.reconciler(auth_rx.clone()).unwrap();
    assert_eq!(laptop_sync.force_sync().await.unwrap(), SyncAction::Pushed);

    // the phone starts empty, so the remote copy is newer
    let phone = Workspace::open(phone_dir.path(), config_with_remote(remote.path()))
        .await
        .unwrap();
    let phone_sync = phone.reconciler(auth_rx.clone()).unwrap();
    assert_eq!(phone_sync.force_sync().await.unwrap(), SyncAction::Pulled);
    assert_eq!(phone.lock().document().contents[0].title, "From laptop");

    // the pull was persisted locally
    phone.close().await;
    let phone = Workspace::open(phone_dir.path(), config_with_remote(remote.path()))
        .await
        .unwrap();
    assert_eq!(phone.lock().document().contents.len(), 1);
    laptop.close().await;
}

use super::adapter::{validate_key, StorageAdapter};
use crate::errors::StorageError;
use async_trait::async_trait;
use notegraph_model::Document;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Device store: one `<key>.json` file per key in a data directory
#[derive(Debug, Clone)]
pub struct LocalAdapter {
    dir: PathBuf,
}

impl LocalAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key, false)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl StorageAdapter for LocalAdapter {
    fn name(&self) -> &str {
        "local"
    }

    async fn get(&self, key: &str) -> Result<Option<Document>, StorageError> {
        read_document(&self.path_for(key)?).await
    }

    async fn set(&self, key: &str, document: &Document) -> Result<(), StorageError> {
        write_document(&self.path_for(key)?, document).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        remove_file(&self.path_for(key)?).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        for path in json_files(&self.dir).await? {
            remove_file(&path).await?;
        }
        Ok(())
    }

    async fn get_size(&self) -> Result<u64, StorageError> {
        let mut total = 0;
        for path in json_files(&self.dir).await? {
            total += fs::metadata(&path).await?.len();
        }
        Ok(total)
    }
}

pub(crate) async fn read_document(path: &Path) -> Result<Option<Document>, StorageError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write through a sibling temp file and rename, so readers never see a
/// half-written document
pub(crate) async fn write_document(path: &Path, document: &Document) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_vec_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).await?;
    fs::rename(&tmp, path).await?;

    debug!(path = %path.display(), bytes = json.len(), "Wrote document");
    Ok(())
}

pub(crate) async fn remove_file(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// `.json` files directly inside `dir`; a missing directory is empty
async fn json_files(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let adapter = LocalAdapter::new(dir.path().join("data"));

        assert!(adapter.get("notes").await.unwrap().is_none());
        assert_eq!(adapter.get_size().await.unwrap(), 0);

        let doc = Document::empty(7);
        adapter.set("notes", &doc).await.unwrap();

        assert!(dir.path().join("data/notes.json").exists());
        assert!(!dir.path().join("data/notes.json.tmp").exists());
        assert_eq!(adapter.get("notes").await.unwrap(), Some(doc));
        assert!(adapter.get_size().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_positions_reload_bit_exact() {
        let dir = TempDir::new().unwrap();
        let adapter = LocalAdapter::new(dir.path());

        let mut doc = Document::empty(7);
        doc.contents.push(std::sync::Arc::new(notegraph_model::Content {
            id: "c1".to_string(),
            area_id: "a1".to_string(),
            title: "Dragged".to_string(),
            status: Default::default(),
            body: Default::default(),
            properties: Vec::new(),
            parent_id: None,
            node_position: Some(notegraph_model::Position::new(92963.45743939163, 814.1259096034263)),
            emoji: None,
            created_at: 7,
            updated_at: 7,
        }));

        for _ in 0..3 {
            adapter.set("notes", &doc).await.unwrap();
            assert_eq!(adapter.get("notes").await.unwrap(), Some(doc.clone()));
        }
    }

    #[tokio::test]
    async fn test_clear_only_touches_json() {
        let dir = TempDir::new().unwrap();
        let adapter = LocalAdapter::new(dir.path());
        std::fs::write(dir.path().join("README"), "keep me").unwrap();

        adapter.set("a", &Document::default()).await.unwrap();
        adapter.set("b", &Document::default()).await.unwrap();
        adapter.clear().await.unwrap();

        assert!(adapter.get("a").await.unwrap().is_none());
        assert!(dir.path().join("README").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_keys() {
        let dir = TempDir::new().unwrap();
        let adapter = LocalAdapter::new(dir.path());

        let result = adapter.set("../escape", &Document::default()).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.json"), "{not json").unwrap();

        let result = LocalAdapter::new(dir.path()).get("notes").await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}

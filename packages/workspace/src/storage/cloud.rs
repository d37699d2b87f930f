use super::adapter::{validate_key, StorageAdapter};
use super::local::{read_document, remove_file, write_document};
use crate::errors::StorageError;
use async_trait::async_trait;
use notegraph_model::Document;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Per-user document store.
///
/// Keys are document paths such as `users/<uid>/document`; each segment
/// becomes a directory under the store root, the last one a `.json` file.
/// The root can be a synced or network-mounted directory.
#[derive(Debug, Clone)]
pub struct CloudAdapter {
    root: PathBuf,
}

impl CloudAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Key of a user's document
    pub fn user_document_key(uid: &str) -> String {
        format!("users/{}/document", uid)
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key, true)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl StorageAdapter for CloudAdapter {
    fn name(&self) -> &str {
        "cloud"
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
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_size(&self) -> Result<u64, StorageError> {
        tree_size(&self.root).await
    }
}

async fn tree_size(root: &Path) -> Result<u64, StorageError> {
    let mut total = 0;
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                total += entry.metadata().await?.len();
            }
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_user_documents_are_nested() {
        let dir = TempDir::new().unwrap();
        let adapter = CloudAdapter::new(dir.path());
        let key = CloudAdapter::user_document_key("u1");

        adapter.set(&key, &Document::empty(9)).await.unwrap();

        assert!(dir.path().join("users/u1/document.json").exists());
        assert_eq!(adapter.get(&key).await.unwrap().map(|d| d.created_at), Some(9));
        assert!(adapter.get("users/u2/document").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_size_and_clear() {
        let dir = TempDir::new().unwrap();
        let adapter = CloudAdapter::new(dir.path().join("remote"));
        assert_eq!(adapter.get_size().await.unwrap(), 0);

        adapter.set("users/a/document", &Document::default()).await.unwrap();
        adapter.set("users/b/document", &Document::default()).await.unwrap();
        assert!(adapter.get_size().await.unwrap() > 0);

        adapter.clear().await.unwrap();
        assert_eq!(adapter.get_size().await.unwrap(), 0);
        assert!(adapter.get("users/a/document").await.unwrap().is_none());
    }
}

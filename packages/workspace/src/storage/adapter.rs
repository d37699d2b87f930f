use crate::errors::StorageError;
use async_trait::async_trait;
use notegraph_model::Document;

/// Narrow key-value interface over a storage backend.
///
/// Values are whole documents; backends store them as JSON.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Stored document, or `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<Document>, StorageError>;

    async fn set(&self, key: &str, document: &Document) -> Result<(), StorageError>;

    /// Removing an absent key succeeds
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;

    /// Bytes currently stored
    async fn get_size(&self) -> Result<u64, StorageError>;
}

/// Reject keys that are empty or could escape the backend's root.
/// `nested` allows `/`-separated path keys.
pub(crate) fn validate_key(key: &str, nested: bool) -> Result<(), StorageError> {
    let invalid = || StorageError::InvalidKey(key.to_string());

    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(invalid());
    }
    if !nested && key.contains('/') {
        return Err(invalid());
    }
    if key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        return Err(invalid());
    }

    Ok(())
}

use super::adapter::{validate_key, StorageAdapter};
use crate::errors::StorageError;
use async_trait::async_trait;
use notegraph_model::Document;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// In-process backend holding serialized documents.
///
/// Used for tests and as the remote stand-in; can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    entries: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with an I/O error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, key: Option<&str>) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "memory adapter offline",
            )));
        }
        match key {
            Some(key) => validate_key(key, true),
            None => Ok(()),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageAdapter for MemoryAdapter {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Document>, StorageError> {
        self.check(Some(key))?;
        match self.entries().get(key) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, document: &Document) -> Result<(), StorageError> {
        self.check(Some(key))?;
        let json = serde_json::to_string(document)?;
        self.entries().insert(key.to_string(), json);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(Some(key))?;
        self.entries().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.check(None)?;
        self.entries().clear();
        Ok(())
    }

    async fn get_size(&self) -> Result<u64, StorageError> {
        self.check(None)?;
        Ok(self
            .entries()
            .iter()
            .map(|(key, value)| (key.len() + value.len()) as u64)
            .sum())
    }
}

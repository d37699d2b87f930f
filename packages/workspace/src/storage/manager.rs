//! Versioned load/save of the whole document through one adapter

use super::adapter::StorageAdapter;
use crate::errors::StorageError;
use notegraph_model::{Clock, Document, SystemClock, SCHEMA_VERSION};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Key the document is stored under when none is configured
pub const DEFAULT_DOCUMENT_KEY: &str = "notegraph-document";

#[derive(Clone)]
pub struct StorageManager {
    adapter: Arc<dyn StorageAdapter>,
    key: String,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageManager")
            .field("adapter", &self.adapter.name())
            .field("key", &self.key)
            .finish()
    }
}

impl StorageManager {
    pub fn new(adapter: Arc<dyn StorageAdapter>, key: impl Into<String>) -> Self {
        Self {
            adapter,
            key: key.into(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn adapter(&self) -> &Arc<dyn StorageAdapter> {
        &self.adapter
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored document, or a fresh empty one when nothing is stored.
    /// Older schema versions are migrated in memory.
    pub async fn load(&self) -> Result<Document, StorageError> {
        match self.adapter.get(&self.key).await? {
            Some(document) => {
                let document = migrate(document)?;
                info!(
                    adapter = self.adapter.name(),
                    key = %self.key,
                    entities = document.entity_count(),
                    updated_at = document.updated_at,
                    "Loaded document"
                );
                Ok(document)
            }
            None => {
                info!(adapter = self.adapter.name(), key = %self.key, "No stored document, starting empty");
                Ok(Document::empty(self.clock.now_millis()))
            }
        }
    }

    /// Write `document` as-is apart from the schema version stamp;
    /// `updated_at` is kept verbatim
    pub async fn save(&self, document: &Document) -> Result<(), StorageError> {
        if document.version == SCHEMA_VERSION {
            self.adapter.set(&self.key, document).await?;
        } else {
            let mut stamped = document.clone();
            stamped.version = SCHEMA_VERSION;
            self.adapter.set(&self.key, &stamped).await?;
        }

        debug!(adapter = self.adapter.name(), updated_at = document.updated_at, "Saved document");
        Ok(())
    }

    pub async fn remove(&self) -> Result<(), StorageError> {
        self.adapter.remove(&self.key).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.adapter.clear().await
    }

    pub async fn size(&self) -> Result<u64, StorageError> {
        self.adapter.get_size().await
    }
}

/// Bring a stored document up to [`SCHEMA_VERSION`].
///
/// Version 1 documents may carry stale area `contentIds` caches; they are
/// rebuilt from each content's `areaId`.
pub fn migrate(mut document: Document) -> Result<Document, StorageError> {
    if document.version > SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchema {
            found: document.version,
            supported: SCHEMA_VERSION,
        });
    }

    if document.version < SCHEMA_VERSION {
        info!(from = document.version, to = SCHEMA_VERSION, "Migrating document");
        document.rebuild_area_index();
        document.version = SCHEMA_VERSION;
    }

    // derived, never trusted from disk
    document.graph = None;
    Ok(document)
}

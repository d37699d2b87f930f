use crate::errors::WorkspaceError;
use crate::storage::DEFAULT_DOCUMENT_KEY;
use notegraph_graph::Viewport;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "notegraph.config.json";

/// Workspace configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Directory holding the local document, relative to the workspace root
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Root of the remote document store; sync is disabled without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_dir: Option<String>,

    #[serde(default = "default_document_key")]
    pub document_key: String,

    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,

    #[serde(default = "default_sync_interval_ms")]
    pub sync_interval_ms: u64,

    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,

    /// Box that unplaced graph nodes are scattered into
    #[serde(default)]
    pub viewport: Viewport,
}

fn default_data_dir() -> String {
    ".notegraph".to_string()
}

fn default_document_key() -> String {
    DEFAULT_DOCUMENT_KEY.to_string()
}

fn default_save_debounce_ms() -> u64 {
    2000
}

fn default_sync_interval_ms() -> u64 {
    15_000
}

fn default_undo_limit() -> usize {
    50
}

impl WorkspaceConfig {
    /// Load config from a directory; defaults when the file is absent
    pub fn load(dir: &Path) -> Result<Self, WorkspaceError> {
        let path = dir.join(DEFAULT_CONFIG_NAME);

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|source| WorkspaceError::Config { path, source })
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config into `dir`
    pub fn save(&self, dir: &Path) -> Result<PathBuf, WorkspaceError> {
        let path = dir.join(DEFAULT_CONFIG_NAME);
        let json = serde_json::to_string_pretty(self).map_err(|source| WorkspaceError::Config {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    pub fn data_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }

    pub fn remote_dir(&self, root: &Path) -> Option<PathBuf> {
        self.remote_dir.as_ref().map(|dir| root.join(dir))
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            remote_dir: None,
            document_key: default_document_key(),
            save_debounce_ms: default_save_debounce_ms(),
            sync_interval_ms: default_sync_interval_ms(),
            undo_limit: default_undo_limit(),
            viewport: Viewport::default(),
        }
    }
}

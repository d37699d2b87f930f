//! # Bound files
//!
//! Portable export of a whole document:
//!
//! ```json
//! { "version": 1, "schemaVersion": 2, "createdAt": 1700000000000,
//!   "checksum": "1c291ca3", "payload": { ...document... } }
//! ```
//!
//! `payload` is either the document object or a base64 string of its JSON.
//! `checksum` is the CRC32 (lowercase hex) of the document JSON bytes.

use crate::errors::BoundFileError;
use crate::storage::migrate;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use notegraph_model::{Document, Timestamp, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Current bound file format version
pub const BOUND_FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadEncoding {
    /// Document embedded as a JSON object
    #[default]
    Plain,
    /// Document JSON as a base64 string
    Base64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundPayload {
    Encoded(String),
    Document(Box<Document>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundFile {
    pub version: u32,
    pub schema_version: u32,
    pub created_at: Timestamp,
    pub checksum: String,
    pub payload: BoundPayload,
}

impl BoundFile {
    pub fn export(document: &Document, encoding: PayloadEncoding, now: Timestamp) -> Result<Self, BoundFileError> {
        let json = serde_json::to_vec(document)?;

        let payload = match encoding {
            PayloadEncoding::Plain => BoundPayload::Document(Box::new(document.clone())),
            PayloadEncoding::Base64 => BoundPayload::Encoded(STANDARD.encode(&json)),
        };

        Ok(Self {
            version: BOUND_FILE_VERSION,
            schema_version: SCHEMA_VERSION,
            created_at: now,
            checksum: checksum(&json),
            payload,
        })
    }

    /// Decode the payload, verify the checksum and migrate the document
    pub fn import(self) -> Result<Document, BoundFileError> {
        if self.version > BOUND_FILE_VERSION {
            return Err(BoundFileError::UnsupportedVersion(self.version));
        }

        let (document, json) = match self.payload {
            BoundPayload::Document(document) => {
                let json = serde_json::to_vec(&document)?;
                (*document, json)
            }
            BoundPayload::Encoded(encoded) => {
                let json = STANDARD.decode(encoded.trim())?;
                (serde_json::from_slice(&json)?, json)
            }
        };

        let actual = checksum(&json);
        if !actual.eq_ignore_ascii_case(&self.checksum) {
            return Err(BoundFileError::ChecksumMismatch {
                expected: self.checksum,
                actual,
            });
        }

        Ok(migrate(document)?)
    }

    pub fn parse(json: &str) -> Result<Self, BoundFileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BoundFileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), BoundFileError> {
        std::fs::write(path, self.to_json()?).map_err(crate::errors::StorageError::from)?;
        info!(path = %path.display(), "Exported bound file");
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, BoundFileError> {
        let json = std::fs::read_to_string(path).map_err(crate::errors::StorageError::from)?;
        Self::parse(&json)
    }
}

fn checksum(bytes: &[u8]) -> String {
    format!("{:08x}", crc32fast::hash(bytes))
}

//! Document metadata map with an optional JSON snapshot on disk

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::chunk::DocumentMetadata;
use crate::error::MetadataError;

#[derive(Debug, Default)]
pub struct MetadataMap {
    path: Option<PathBuf>,
    records: BTreeMap<String, DocumentMetadata>,
}

impl MetadataMap {
    /// Map with no backing file (for testing)
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the snapshot at `path`, or start empty if there is none yet
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let records = if path.exists() {
            let raw = fs::read_to_string(path).map_err(|source| MetadataError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| MetadataError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            records,
        })
    }

    pub fn get(&self, document_id: &str) -> Option<&DocumentMetadata> {
        self.records.get(document_id)
    }

    /// Replace the record for `document_id`, returning the one it replaced
    pub fn put(&mut self, document_id: &str, record: DocumentMetadata) -> Option<DocumentMetadata> {
        self.records.insert(document_id.to_string(), record)
    }

    /// Put back what `put` returned
    pub fn restore(&mut self, document_id: &str, previous: Option<DocumentMetadata>) {
        match previous {
            Some(record) => {
                self.records.insert(document_id.to_string(), record);
            }
            None => {
                self.records.remove(document_id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DocumentMetadata)> {
        self.records.iter()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the snapshot back to disk; a no-op for in-memory maps
    pub fn flush(&self) -> Result<(), MetadataError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.records).map_err(|source| {
            MetadataError::Json {
                path: path.clone(),
                source,
            }
        })?;

        // replaced via rename, never written in place
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|source| MetadataError::Io {
                path: path.clone(),
                source,
            })
    }
}

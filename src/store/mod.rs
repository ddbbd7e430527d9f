//! Document store: the vector index plus the document metadata map
//!
//! Lifecycle:
//! - `open` creates the storage directory on first use, opens the index and
//!   loads the metadata snapshot if one exists
//! - `store` flushes the metadata snapshot before inserting chunks; if either
//!   step fails the previous record is put back and no chunks are committed
//! - `from_parts` builds a store from explicit parts with no disk state

pub mod metadata_map;

pub use metadata_map::MetadataMap;

use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::chunk::{Chunk, DocumentMetadata, MetadataInput};
use crate::core::pdf;
use crate::core::splitter::TextSplitter;
use crate::error::{MetadataError, Result, StoreError};
use crate::search::index::{ChunkInsert, IndexStats, SqliteIndex, VectorIndex};
use crate::search::ranker;

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub chunk_count: usize,
    pub document_count: usize,
    pub last_indexed: Option<i64>,
}

pub struct DocumentStore<I = SqliteIndex> {
    index: I,
    metadata: MetadataMap,
    splitter: TextSplitter,
}

impl DocumentStore<SqliteIndex> {
    /// Open the store under `config.store_dir`, creating it if needed
    pub fn open(config: &Config) -> Result<Self> {
        let dir = config.store_dir();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| MetadataError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            info!(path = %dir.display(), "created document store");
        }

        let index = SqliteIndex::open(&config.index_path())?;
        let metadata = MetadataMap::load(&config.metadata_path())?;
        info!(
            path = %dir.display(),
            documents = metadata.len(),
            "opened document store"
        );

        Ok(Self::from_parts(index, metadata))
    }
}

impl<I: VectorIndex> DocumentStore<I> {
    pub fn from_parts(index: I, metadata: MetadataMap) -> Self {
        Self {
            index,
            metadata,
            splitter: TextSplitter::default(),
        }
    }

    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Tag `chunks` with the resolved metadata and insert them as one batch.
    ///
    /// Missing fields default to the current time, `"v1.0"` and `"Public"`.
    /// The document's metadata record is replaced with the resolved record.
    pub fn store(
        &mut self,
        document_id: &str,
        chunks: Vec<String>,
        metadata: MetadataInput,
    ) -> Result<()> {
        self.store_at(document_id, chunks, metadata, Local::now().naive_local())
    }

    /// `store` with an explicit clock for the date default
    pub fn store_at(
        &mut self,
        document_id: &str,
        chunks: Vec<String>,
        metadata: MetadataInput,
        now: NaiveDateTime,
    ) -> Result<()> {
        if document_id.is_empty() {
            return Err(StoreError::InvalidInput(
                "document identifier must not be empty".to_string(),
            ));
        }
        if chunks.is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "no chunks to store for {}",
                document_id
            )));
        }

        let record = metadata.resolve(now);
        let chunk_count = chunks.len();
        let batch: Vec<ChunkInsert> = chunks
            .into_iter()
            .map(|content| (content, record.for_chunk(document_id).into_map()))
            .collect();

        let previous = self.metadata.put(document_id, record.clone());
        if let Err(e) = self.metadata.flush() {
            self.metadata.restore(document_id, previous);
            return Err(e.into());
        }

        if let Err(e) = self.index.insert_batch(batch) {
            self.metadata.restore(document_id, previous);
            if let Err(flush_err) = self.metadata.flush() {
                warn!(
                    document = document_id,
                    error = %flush_err,
                    "could not roll back metadata snapshot"
                );
            }
            return Err(e.into());
        }

        info!(
            document = document_id,
            chunks = chunk_count,
            date = %record.date,
            version = %record.version_tag,
            security = %record.security_tag,
            "stored document"
        );
        Ok(())
    }

    /// Load, split and store a file. Returns the number of chunks stored.
    pub fn store_file(&mut self, path: &Path, metadata: MetadataInput) -> Result<usize> {
        let text = pdf::load_text(path)?;
        let chunks = self.splitter.split(&text);
        let count = chunks.len();
        self.store(&pdf::document_id(path), chunks, metadata)?;
        Ok(count)
    }

    /// Chunks closest to `target_date` that `clearance` may see
    pub fn retrieve_by_date(&self, target_date: &str, clearance: Option<&str>) -> Result<Vec<Chunk>> {
        ranker::retrieve_by_date(&self.index, target_date, clearance)
    }

    /// Plain similarity search over the index
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Chunk>> {
        self.index
            .search_candidates(query, limit)?
            .into_iter()
            .map(Chunk::try_from)
            .collect()
    }

    pub fn document(&self, document_id: &str) -> Option<&DocumentMetadata> {
        self.metadata.get(document_id)
    }

    pub fn documents(&self) -> &MetadataMap {
        &self.metadata
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let IndexStats {
            chunk_count,
            last_indexed,
        } = self.index.stats()?;

        Ok(StoreStats {
            chunk_count,
            document_count: self.metadata.len(),
            last_indexed,
        })
    }
}

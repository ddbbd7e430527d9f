//! Vector index backed by SQLite
//!
//! Chunks are stored with their metadata as a JSON object and their
//! embedding as a BLOB; similarity is computed in Rust.

use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use std::path::Path;

use super::embedding::{cosine_similarity, Embedder};
use crate::core::chunk::StoredChunk;
use crate::error::IndexError;

/// Text plus arbitrary metadata, as handed to the index
pub type ChunkInsert = (String, Map<String, Value>);

/// The capabilities the document store needs from a vector index
pub trait VectorIndex {
    /// Insert all chunks or none of them
    fn insert_batch(&mut self, chunks: Vec<ChunkInsert>) -> Result<(), IndexError>;

    /// Return up to `max_results` stored chunks.
    ///
    /// An empty hint asks for an unranked sample; otherwise results are
    /// ordered by similarity to the hint.
    fn search_candidates(
        &self,
        query_hint: &str,
        max_results: usize,
    ) -> Result<Vec<StoredChunk>, IndexError>;

    fn stats(&self) -> Result<IndexStats, IndexError>;
}

/// Index statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub chunk_count: usize,
    pub last_indexed: Option<i64>,
}

pub struct SqliteIndex {
    conn: Connection,
    embedder: Embedder,
}

impl SqliteIndex {
    /// Open or create the index at `db_path`
    pub fn open(db_path: &Path) -> Result<Self, IndexError> {
        Self::with_connection(Connection::open(db_path)?)
    }

    /// Open in-memory index (for testing)
    pub fn open_in_memory() -> Result<Self, IndexError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, IndexError> {
        let index = Self {
            conn,
            embedder: Embedder::new(),
        };
        index.init_schema()?;
        Ok(index)
    }

    fn init_schema(&self) -> Result<(), IndexError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                metadata TEXT NOT NULL,  -- JSON object
                embedding BLOB NOT NULL,
                indexed_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn sample(&self, limit: usize) -> Result<Vec<StoredChunk>, IndexError> {
        let mut stmt = self
            .conn
            .prepare("SELECT content, metadata FROM chunks ORDER BY id LIMIT ?1")?;
        let rows = stmt.query_map(params![limit_param(limit)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut chunks = Vec::new();
        for row in rows {
            let (content, metadata) = row?;
            chunks.push(decode_chunk(content, &metadata)?);
        }
        Ok(chunks)
    }

    fn ranked(&self, query: &str, limit: usize) -> Result<Vec<StoredChunk>, IndexError> {
        let query_embedding = self.embedder.embed(query);

        let mut stmt = self
            .conn
            .prepare("SELECT content, metadata, embedding FROM chunks ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })?;

        let mut scored: Vec<(StoredChunk, f32)> = Vec::new();
        for row in rows {
            let (content, metadata, blob) = row?;
            let similarity = cosine_similarity(&query_embedding, &blob_to_embedding(&blob));
            scored.push((decode_chunk(content, &metadata)?, similarity));
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored.into_iter().map(|(chunk, _)| chunk).collect())
    }
}

impl VectorIndex for SqliteIndex {
    fn insert_batch(&mut self, chunks: Vec<ChunkInsert>) -> Result<(), IndexError> {
        let now = chrono::Utc::now().timestamp();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO chunks (content, metadata, embedding, indexed_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (content, metadata) in &chunks {
                let metadata_json = serde_json::to_string(metadata)?;
                let blob = embedding_to_blob(&self.embedder.embed(content));
                stmt.execute(params![content, metadata_json, blob, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn search_candidates(
        &self,
        query_hint: &str,
        max_results: usize,
    ) -> Result<Vec<StoredChunk>, IndexError> {
        if query_hint.trim().is_empty() {
            self.sample(max_results)
        } else {
            self.ranked(query_hint, max_results)
        }
    }

    fn stats(&self) -> Result<IndexStats, IndexError> {
        let (count, last_indexed): (i64, Option<i64>) = self.conn.query_row(
            "SELECT COUNT(*), MAX(indexed_at) FROM chunks",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(IndexStats {
            chunk_count: count as usize,
            last_indexed,
        })
    }
}

fn decode_chunk(content: String, metadata: &str) -> Result<StoredChunk, IndexError> {
    Ok(StoredChunk {
        content,
        metadata: serde_json::from_str(metadata)?,
    })
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

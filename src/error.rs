//! Error types for the document store
//!
//! Callers can tell bad input (`InvalidInput`, `InvalidDate`) apart from bad
//! stored data (`MalformedCandidate`) and backend failures (`Index`).

use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by the vector index backend
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("metadata serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while loading a source document from disk
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed for {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("unsupported file type: {0}")]
    UnsupportedFile(PathBuf),

    #[error("no text could be extracted from {0}")]
    Empty(PathBuf),
}

/// Failure while reading or writing the document metadata snapshot
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("malformed candidate chunk: {0}")]
    MalformedCandidate(String),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

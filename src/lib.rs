//! pdf-vault library
//!
//! Local document store for chunked PDFs with date-proximity retrieval.
//!
//! # Modules
//!
//! - `core`: chunk and metadata records, clearance levels, loading and splitting
//! - `search`: embedding, the vector index, and the date-proximity ranker
//! - `store`: the document store tying the index and metadata map together

pub mod config;
pub mod core;
pub mod error;
pub mod search;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::chunk::{Chunk, ChunkMetadata, DocumentMetadata, MetadataInput};
pub use crate::core::clearance::Clearance;
pub use error::{DocumentError, IndexError, MetadataError, StoreError};
pub use search::index::{SqliteIndex, VectorIndex};
pub use search::ranker::{retrieve_by_date, CANDIDATE_CAP};
pub use store::{DocumentStore, MetadataMap, StoreStats};

//! Vector index and retrieval
//!
//! The index returns candidate chunks; the ranker filters them by clearance
//! and orders them by distance from a target date.

pub mod embedding;
pub mod index;
pub mod ranker;

pub use embedding::Embedder;
pub use index::{SqliteIndex, VectorIndex};
pub use ranker::retrieve_by_date;

pub mod ingest;
pub mod retrieve;
pub mod search;
pub mod show;
pub mod status;

pub mod chunk;
pub mod clearance;
pub mod pdf;
pub mod splitter;

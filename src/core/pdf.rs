//! Source document loading
//!
//! PDFs go through `pdf-extract`; plain text and markdown are read directly.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DocumentError;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Document identifier for a source file: its file name
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub fn is_supported(path: &Path) -> bool {
    extension(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Extract the full text of a supported file
pub fn load_text(path: &Path) -> Result<String, DocumentError> {
    let text = match extension(path).as_deref() {
        Some("pdf") => pdf_extract::extract_text(path).map_err(|e| DocumentError::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        Some("txt") | Some("md") => fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?,
        _ => return Err(DocumentError::UnsupportedFile(path.to_path_buf())),
    };

    if text.trim().is_empty() {
        return Err(DocumentError::Empty(path.to_path_buf()));
    }
    Ok(text)
}

/// All supported files under `root` (or `root` itself if it is a file), sorted
pub fn collect_documents(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_supported(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

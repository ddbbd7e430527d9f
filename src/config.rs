use std::path::{Path, PathBuf};

pub const DEFAULT_STORE_DIR: &str = "./pdf_store";
pub const ENV_STORE_DIR: &str = "PDF_VAULT_DIR";

const INDEX_FILE: &str = "index.db";
const METADATA_FILE: &str = "metadata.json";

/// Where the index and the document metadata snapshot live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_dir: PathBuf,
}

impl Config {
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
        }
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.store_dir.join(INDEX_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.store_dir.join(METADATA_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_DIR)
    }
}

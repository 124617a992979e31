//! Filesystem data store operations.
//!
//! All entities live as JSONL files under the data directory. JSONL is
//! the source of truth; derived standings are recomputed on every read.

use std::path::PathBuf;
use thiserror::Error;

mod jsonl;

pub use jsonl::{EntityType, JsonlStore};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Directory holding the entity JSONL files.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

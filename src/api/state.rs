use std::sync::Arc;

use crate::storage::StorageConfig;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,

    /// Serializes read-modify-write cycles on the store within this
    /// process. There is no cross-process coordination.
    pub write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            storage: Arc::new(storage),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

//! JSON file-backed `ChatStateRepository`.

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use parley_core::error::{ParleyError, Result};
use parley_core::state::{ChatState, ChatStateRepository};
use std::path::PathBuf;
use std::sync::Arc;

/// Persists the whole chat aggregate as one JSON document.
///
/// File I/O runs on the blocking pool so the async store never stalls the
/// runtime.
#[derive(Clone)]
pub struct JsonStateRepository {
    file: Arc<AtomicJsonFile<ChatState>>,
}

impl JsonStateRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}

#[async_trait]
impl ChatStateRepository for JsonStateRepository {
    async fn load(&self) -> Result<Option<ChatState>> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| ParleyError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!(
            "[JsonStateRepository] Loaded {:?}: {}",
            self.file.path(),
            if loaded.is_some() { "found" } else { "empty" }
        );
        Ok(loaded)
    }

    async fn save(&self, state: &ChatState) -> Result<()> {
        let file = self.file.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || file.save(&state))
            .await
            .map_err(|e| ParleyError::internal(format!("Failed to join task: {}", e)))??;
        Ok(())
    }
}

//! In-memory `ChatStateRepository` for ephemeral sessions.

use async_trait::async_trait;
use parley_core::error::Result;
use parley_core::state::{ChatState, ChatStateRepository};
use tokio::sync::Mutex;

/// Keeps the last saved state in memory; nothing survives the process.
#[derive(Default)]
pub struct MemoryStateRepository {
    stored: Mutex<Option<ChatState>>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ChatState) -> Self {
        Self {
            stored: Mutex::new(Some(state)),
        }
    }
}

#[async_trait]
impl ChatStateRepository for MemoryStateRepository {
    async fn load(&self) -> Result<Option<ChatState>> {
        Ok(self.stored.lock().await.clone())
    }

    async fn save(&self, state: &ChatState) -> Result<()> {
        *self.stored.lock().await = Some(state.clone());
        Ok(())
    }
}

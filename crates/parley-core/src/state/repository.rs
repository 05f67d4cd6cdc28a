//! Chat state repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::model::ChatState;

/// Durable storage for the chat state aggregate.
///
/// The aggregate is always read and written whole; implementations never see
/// partial updates.
#[async_trait]
pub trait ChatStateRepository: Send + Sync {
    /// Loads the stored state.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(state))`: A state was stored and parsed
    /// - `Ok(None)`: Nothing has been stored yet
    /// - `Err(_)`: The stored state could not be read or parsed
    async fn load(&self) -> Result<Option<ChatState>>;

    /// Replaces the stored state.
    async fn save(&self, state: &ChatState) -> Result<()>;
}

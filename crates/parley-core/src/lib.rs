//! Domain layer for Parley.
//!
//! Conversations, the `ChatState` aggregate and the store that owns it, the
//! markdown formatter, composer state, and the ports the outer layers
//! implement (state persistence, reply backend).

pub mod composer;
pub mod config;
pub mod conversation;
pub mod error;
pub mod markdown;
pub mod notice;
pub mod reply;
pub mod state;
pub mod store;

// Re-export common types
pub use error::{ParleyError, Result};
pub use notice::{Notice, NoticeLevel};
pub use state::ChatState;
pub use store::ConversationStore;

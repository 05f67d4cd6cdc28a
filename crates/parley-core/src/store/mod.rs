//! Conversation store.
//!
//! The store is the single owner of the `ChatState` aggregate. Presentation
//! layers receive it explicitly and redraw from the snapshots it publishes.

mod conversation_store;

pub use conversation_store::ConversationStore;

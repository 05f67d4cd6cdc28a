//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: The `Conversation` entity and title derivation
//! - `message`: Message types (`MessageRole`, `Message`, `MessageMetadata`)

mod message;
mod model;

pub use message::{Message, MessageMetadata, MessageRole};
pub use model::{Conversation, DEFAULT_TITLE, GREETING, derive_title};

//! Reply backend port.
//!
//! A reply is an asynchronous operation keyed by conversation ID. The store's
//! append contract does not care whether the reply came from a timer, a local
//! model or a network call.

use crate::composer::PendingImage;
use crate::conversation::Message;
use crate::error::Result;
use async_trait::async_trait;

/// What the assistant is being asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    Text { prompt: String },
    ImageAnalysis { prompt: String, image: PendingImage },
    ImageGeneration { prompt: String },
}

impl ReplyKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::ImageAnalysis { .. } => "image_analysis",
            Self::ImageGeneration { .. } => "image_generation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    /// Conversation the reply must land in.
    pub conversation_id: String,
    pub kind: ReplyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub conversation_id: String,
    pub message: Message,
}

/// Produces assistant replies.
#[async_trait]
pub trait ReplyBackend: Send + Sync {
    async fn reply(&self, request: ReplyRequest) -> Result<Reply>;
}

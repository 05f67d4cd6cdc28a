//! Simulated reply backend.
//!
//! Stands in for a real model: waits a fixed delay per reply kind, then
//! returns a canned assistant message.

use async_trait::async_trait;
use parley_core::config::ReplyConfig;
use parley_core::conversation::{Message, MessageMetadata};
use parley_core::error::Result;
use parley_core::reply::{Reply, ReplyBackend, ReplyKind, ReplyRequest};
use rand::seq::SliceRandom;

pub const TEXT_REPLIES: [&str; 4] = [
    "That's an interesting question! Let me help you with that.",
    "I understand what you're asking. Here's what I think...",
    "Great question! Based on my knowledge...",
    "Let me break this down for you.",
];

pub const IMAGE_ANALYSIS_REPLY: &str = "I can see the image you uploaded. This appears to be an interesting visual. Let me analyze it for you...";

pub const IMAGE_GENERATION_REPLY: &str = "Image generated successfully!";

/// Sample picture returned for every generation request.
pub const SAMPLE_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1506748686214-e9df14d4d9d0?w=800";

#[derive(Debug, Clone, Default)]
pub struct SimulatedReplyBackend {
    delays: ReplyConfig,
}

impl SimulatedReplyBackend {
    pub fn new(delays: ReplyConfig) -> Self {
        Self { delays }
    }

    fn compose(kind: &ReplyKind) -> Message {
        match kind {
            ReplyKind::Text { .. } => {
                let text = TEXT_REPLIES
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(TEXT_REPLIES[0]);
                Message::assistant(text)
            }
            ReplyKind::ImageAnalysis { .. } => Message::assistant(IMAGE_ANALYSIS_REPLY),
            ReplyKind::ImageGeneration { prompt } => Message::assistant(IMAGE_GENERATION_REPLY)
                .with_meta(MessageMetadata::generated_image(SAMPLE_IMAGE_URL, prompt.clone())),
        }
    }
}

#[async_trait]
impl ReplyBackend for SimulatedReplyBackend {
    async fn reply(&self, request: ReplyRequest) -> Result<Reply> {
        let delay = match request.kind {
            ReplyKind::Text { .. } => self.delays.text_delay(),
            ReplyKind::ImageAnalysis { .. } => self.delays.image_analysis_delay(),
            ReplyKind::ImageGeneration { .. } => self.delays.image_generation_delay(),
        };
        tokio::time::sleep(delay).await;

        Ok(Reply {
            message: Self::compose(&request.kind),
            conversation_id: request.conversation_id,
        })
    }
}

//! Message composer state.
//!
//! Holds what the user is typing and how the next send will be routed. The
//! composer never talks to the store itself: `send` only decides which action
//! to dispatch.

use serde::{Deserialize, Serialize};

/// An image attached to the composer, waiting for a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingImage {
    /// `data:<mime>;base64,<payload>`; doubles as the preview source.
    pub data_url: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl PendingImage {
    /// Wraps a data URL restored from storage, recovering the MIME type from
    /// its header.
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        let data_url = data_url.into();
        let mime_type = data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            size_bytes: data_url.len() as u64,
            data_url,
            mime_type,
        }
    }
}

/// What a send turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    /// Ask about an attached image.
    AnalyzeImage { prompt: String, image: PendingImage },
    /// Generate an image from the prompt.
    GenerateImage { prompt: String },
    /// Plain chat message.
    Text { text: String },
}

/// Indicator shown above the input box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerMode {
    Chat,
    ImageAnalysis,
    ImageGeneration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerState {
    pub draft: String,
    pub pending_image: Option<PendingImage>,
    pub image_generation: bool,
}

impl ComposerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn attach_image(&mut self, image: PendingImage) {
        self.pending_image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.pending_image = None;
    }

    /// Flips image-generation mode and returns the new value.
    pub fn toggle_image_generation(&mut self) -> bool {
        self.image_generation = !self.image_generation;
        self.image_generation
    }

    /// Whether the send button is enabled.
    pub fn can_send(&self, is_processing: bool) -> bool {
        !is_processing && !self.draft.trim().is_empty()
    }

    /// Turns the draft into an action.
    ///
    /// Routing, first match wins: an attached image goes to image analysis
    /// (and is consumed), then image-generation mode, then plain text.
    /// Returns `None` and changes nothing when the draft is blank or a reply
    /// is pending.
    pub fn send(&mut self, is_processing: bool) -> Option<ComposerAction> {
        if !self.can_send(is_processing) {
            return None;
        }

        let prompt = std::mem::take(&mut self.draft);
        let action = if let Some(image) = self.pending_image.take() {
            ComposerAction::AnalyzeImage { prompt, image }
        } else if self.image_generation {
            ComposerAction::GenerateImage { prompt }
        } else {
            ComposerAction::Text { text: prompt }
        };
        Some(action)
    }

    pub fn mode(&self) -> ComposerMode {
        if self.image_generation {
            ComposerMode::ImageGeneration
        } else if self.pending_image.is_some() {
            ComposerMode::ImageAnalysis
        } else {
            ComposerMode::Chat
        }
    }

    pub fn placeholder(&self) -> &'static str {
        if self.image_generation {
            "Describe the image you want to generate..."
        } else if self.pending_image.is_some() {
            "Ask a question about the image..."
        } else {
            "Message AI Assistant..."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> PendingImage {
        PendingImage::from_data_url("data:image/png;base64,iVBORw0KGgo=")
    }

    #[test]
    fn test_blank_draft_is_ignored() {
        let mut composer = ComposerState::new();
        composer.set_draft("   \n ");
        assert_eq!(composer.send(false), None);
        assert_eq!(composer.draft, "   \n ");
    }

    #[test]
    fn test_send_while_processing_is_ignored() {
        let mut composer = ComposerState::new();
        composer.set_draft("hello");
        assert_eq!(composer.send(true), None);
        assert_eq!(composer.draft, "hello");
    }

    #[test]
    fn test_plain_text_send_clears_draft() {
        let mut composer = ComposerState::new();
        composer.set_draft("hello");
        assert_eq!(
            composer.send(false),
            Some(ComposerAction::Text {
                text: "hello".to_string()
            })
        );
        assert!(composer.draft.is_empty());
    }

    #[test]
    fn test_pending_image_wins_over_generation_mode() {
        let mut composer = ComposerState::new();
        composer.attach_image(image());
        composer.toggle_image_generation();
        composer.set_draft("what is this?");

        let action = composer.send(false).unwrap();
        assert_eq!(
            action,
            ComposerAction::AnalyzeImage {
                prompt: "what is this?".to_string(),
                image: image(),
            }
        );
        assert!(composer.pending_image.is_none());
        assert!(composer.image_generation);
    }

    #[test]
    fn test_generation_mode_routes_to_generate() {
        let mut composer = ComposerState::new();
        assert!(composer.toggle_image_generation());
        composer.set_draft("a red fox");
        assert_eq!(
            composer.send(false),
            Some(ComposerAction::GenerateImage {
                prompt: "a red fox".to_string()
            })
        );
    }

    #[test]
    fn test_mode_and_placeholder() {
        let mut composer = ComposerState::new();
        assert_eq!(composer.mode(), ComposerMode::Chat);
        assert_eq!(composer.placeholder(), "Message AI Assistant...");

        composer.attach_image(image());
        assert_eq!(composer.mode(), ComposerMode::ImageAnalysis);
        assert_eq!(composer.placeholder(), "Ask a question about the image...");

        composer.toggle_image_generation();
        assert_eq!(composer.mode(), ComposerMode::ImageGeneration);
        assert_eq!(
            composer.placeholder(),
            "Describe the image you want to generate..."
        );
    }

    #[test]
    fn test_pending_image_mime_from_data_url() {
        assert_eq!(image().mime_type, "image/png");
        assert_eq!(
            PendingImage::from_data_url("garbage").mime_type,
            "application/octet-stream"
        );
    }
}

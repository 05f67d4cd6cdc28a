//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles, content and optional image metadata.

use serde::{Deserialize, Serialize};

/// Represents the author of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    #[serde(rename = "ai")]
    Assistant,
}

impl MessageRole {
    pub fn is_user(self) -> bool {
        matches!(self, Self::User)
    }
}

/// Image-related flags attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    /// The user attached an image to this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_image: Option<bool>,
    /// URL of an image produced for this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
    /// Prompt the generated image was produced from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    /// Free-form result of an image analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_result: Option<String>,
}

impl MessageMetadata {
    /// Metadata for a user message carrying an attached image.
    pub fn attached_image() -> Self {
        Self {
            has_image: Some(true),
            ..Self::default()
        }
    }

    /// Metadata for an assistant message carrying a generated image.
    pub fn generated_image(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            generated_image: Some(url.into()),
            image_prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    pub fn has_image(&self) -> bool {
        self.has_image.unwrap_or(false)
    }
}

/// A single message in a conversation history.
///
/// Messages are immutable once created; the owning conversation only ever
/// appends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The author of the message.
    pub role: MessageRole,
    /// Raw markdown text.
    pub text: String,
    /// Creation time as Unix milliseconds.
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MessageMetadata>,
}

impl Message {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            time: chrono::Utc::now().timestamp_millis(),
            meta: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    pub fn with_meta(mut self, meta: MessageMetadata) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn has_image(&self) -> bool {
        self.meta.as_ref().is_some_and(MessageMetadata::has_image)
    }

    pub fn generated_image(&self) -> Option<&str> {
        self.meta.as_ref()?.generated_image.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"ai\""
        );
    }

    #[test]
    fn test_metadata_skips_unset_fields() {
        let message = Message::user("look").with_meta(MessageMetadata::attached_image());
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["meta"]["hasImage"], serde_json::json!(true));
        assert!(json["meta"].get("generatedImage").is_none());
        assert!(message.has_image());
    }

    #[test]
    fn test_message_without_meta_has_no_image() {
        let message = Message::assistant("hello");
        assert!(!message.has_image());
        assert!(message.generated_image().is_none());
    }
}

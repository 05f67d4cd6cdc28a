//! Chat state domain model.
//!
//! `ChatState` is the root aggregate and the unit of persistence: it is
//! serialized in full after every mutation and restored in full on startup.

use crate::conversation::Conversation;
use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};

/// Everything the chat remembers across restarts.
///
/// # Invariants
///
/// - `conversations` is never empty.
/// - `active_id` always names a member of `conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    /// Conversations in store order (creation order).
    pub conversations: Vec<Conversation>,
    /// ID of the conversation composer actions target.
    pub active_id: String,
    /// A reply is in flight.
    #[serde(default)]
    pub is_processing: bool,
    /// The composer sends prompts to image generation.
    #[serde(default)]
    pub image_generation_enabled: bool,
    /// Image waiting to be sent with the next prompt, as a data URL.
    #[serde(default)]
    pub current_image_data_url: Option<String>,
}

impl ChatState {
    /// Creates a state holding a single fresh conversation.
    pub fn new() -> Self {
        let conversation = Conversation::new();
        Self {
            active_id: conversation.id.clone(),
            conversations: vec![conversation],
            is_processing: false,
            image_generation_enabled: false,
            current_image_data_url: None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Returns the active conversation.
    ///
    /// The invariants guarantee it exists; a violated invariant is reported as
    /// an internal error rather than a panic.
    pub fn active(&self) -> Result<&Conversation> {
        self.find(&self.active_id)
            .ok_or_else(|| ParleyError::internal(format!("active id '{}' is dangling", self.active_id)))
    }

    /// Repairs a freshly deserialized state.
    ///
    /// No reply survives a restart, so the processing flag is cleared, and a
    /// dangling active id falls back to the first conversation. A state with no
    /// conversations cannot be repaired.
    pub fn normalize(mut self) -> Result<Self> {
        let Some(first) = self.conversations.first() else {
            return Err(ParleyError::Serialization {
                format: "JSON".to_string(),
                message: "stored chat state has no conversations".to_string(),
            });
        };
        if !self.contains(&self.active_id) {
            tracing::warn!(
                "[ChatState] active id '{}' not found, falling back to '{}'",
                self.active_id,
                first.id
            );
            self.active_id = first.id.clone();
        }
        self.is_processing = false;
        Ok(self)
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Message, MessageMetadata};

    #[test]
    fn test_new_state_is_consistent() {
        let state = ChatState::new();
        assert_eq!(state.conversations.len(), 1);
        assert_eq!(state.active().unwrap().id, state.active_id);
        assert!(!state.is_processing);
        assert!(!state.image_generation_enabled);
        assert!(state.current_image_data_url.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = ChatState::new();
        let id = state.active_id.clone();
        let conversation = state.find_mut(&id).unwrap();
        conversation.push(Message::user("draw a cat"));
        conversation.push(
            Message::assistant("Image generated successfully!")
                .with_meta(MessageMetadata::generated_image("https://example.com/cat.png", "a cat")),
        );
        state.image_generation_enabled = true;
        state.current_image_data_url = Some("data:image/png;base64,AAAA".to_string());

        let json = serde_json::to_string(&state).unwrap();
        let restored: ChatState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_wire_field_names() {
        let state = ChatState::new();
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("activeId").is_some());
        assert!(json.get("isProcessing").is_some());
        assert!(json.get("imageGenerationEnabled").is_some());
        assert!(json.get("currentImageDataUrl").is_some());
        assert!(json["conversations"][0].get("createdAt").is_some());
    }

    #[test]
    fn test_normalize_clears_processing_and_repairs_active_id() {
        let mut state = ChatState::new();
        state.is_processing = true;
        state.active_id = "c_missing".to_string();

        let state = state.normalize().unwrap();
        assert!(!state.is_processing);
        assert_eq!(state.active_id, state.conversations[0].id);
    }

    #[test]
    fn test_normalize_rejects_empty_state() {
        let mut state = ChatState::new();
        state.conversations.clear();
        assert!(state.normalize().unwrap_err().is_serialization());
    }
}

//! Conversation domain model.

use super::message::{Message, MessageRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder title every new conversation starts with.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Assistant greeting seeded into every new conversation.
pub const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Number of leading words kept by title auto-derivation.
const TITLE_WORDS: usize = 5;

/// A titled, ordered list of messages.
///
/// Message order is append order; nothing ever reorders or removes messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation identifier (`c_` + UUID)
    pub id: String,
    /// Human-readable title shown in the sidebar
    pub title: String,
    /// Creation time as Unix milliseconds
    pub created_at: i64,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Creates a conversation with a fresh id, the default title and the
    /// assistant greeting.
    pub fn new() -> Self {
        Self {
            id: format!("c_{}", Uuid::new_v4().simple()),
            title: DEFAULT_TITLE.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
            messages: vec![Message::assistant(GREETING)],
        }
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.role.is_user()).count()
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
    }

    /// Appends a message, deriving the title from the first user message while
    /// the title is still the placeholder.
    pub fn push(&mut self, message: Message) {
        if message.role.is_user() && self.user_message_count() == 0 && self.has_default_title() {
            self.title = derive_title(&message.text);
        }
        self.messages.push(message);
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a title from the first five whitespace-delimited words of `text`.
///
/// An ellipsis is appended whenever five words were taken, even if the text
/// had exactly five.
pub fn derive_title(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(TITLE_WORDS).collect();
    let mut title = words.join(" ");
    if words.len() >= TITLE_WORDS {
        title.push_str("...");
    }
    title
}

use crate::conversation::{Conversation, Message};
use crate::error::{ParleyError, Result};
use crate::state::{ChatState, ChatStateRepository};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// Owns the chat state and is the only way to change it.
///
/// `ConversationStore` is responsible for:
/// - Conversation lifecycle (create, select, rename, delete)
/// - Appending messages, including title auto-derivation
/// - The processing gate and composer flags that persist with the state
/// - Persisting the whole aggregate after every mutation
/// - Publishing an immutable snapshot after every committed mutation
///
/// Mutations are serialized through a single writer lock. Each one is applied
/// to a copy of the state, saved, and only then committed, so a failed save
/// leaves the in-memory state untouched. `finish_processing` is the one
/// exception: clearing the processing flag always commits.
pub struct ConversationStore {
    /// Current state; holding the lock makes the holder the only writer
    state: Mutex<ChatState>,
    /// Snapshot publisher for presentation layers
    snapshots: watch::Sender<Arc<ChatState>>,
    /// Persistent storage backend for the aggregate
    repository: Arc<dyn ChatStateRepository>,
}

impl ConversationStore {
    /// Opens the store, restoring the previously saved state.
    ///
    /// Falls back to a single fresh conversation when nothing is stored or the
    /// stored state cannot be read. Never fails: a broken store file must not
    /// keep the chat from starting.
    pub async fn open(repository: Arc<dyn ChatStateRepository>) -> Self {
        let state = match repository.load().await {
            Ok(Some(stored)) => match stored.normalize() {
                Ok(state) => {
                    tracing::info!(
                        "[ConversationStore] Restored {} conversation(s)",
                        state.conversations.len()
                    );
                    state
                }
                Err(e) => {
                    tracing::warn!("[ConversationStore] Discarding stored state: {}", e);
                    ChatState::new()
                }
            },
            Ok(None) => {
                tracing::info!("[ConversationStore] No stored state, starting fresh");
                ChatState::new()
            }
            Err(e) => {
                tracing::warn!("[ConversationStore] Failed to load stored state: {}", e);
                ChatState::new()
            }
        };

        Self::with_state(state, repository)
    }

    /// Creates a store around an already valid state without touching storage.
    pub fn with_state(state: ChatState, repository: Arc<dyn ChatStateRepository>) -> Self {
        let (snapshots, _) = watch::channel(Arc::new(state.clone()));
        Self {
            state: Mutex::new(state),
            snapshots,
            repository,
        }
    }

    /// Returns the latest committed state.
    pub fn snapshot(&self) -> Arc<ChatState> {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to committed states.
    ///
    /// The receiver always holds the latest snapshot; intermediate snapshots
    /// may be skipped by slow consumers.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ChatState>> {
        self.snapshots.subscribe()
    }

    /// Creates a new conversation, seeded with the assistant greeting, and
    /// makes it active.
    ///
    /// # Returns
    ///
    /// The ID of the new conversation.
    pub async fn create_conversation(&self) -> Result<String> {
        self.update("create_conversation", |state| {
            let conversation = Conversation::new();
            let id = conversation.id.clone();
            state.conversations.push(conversation);
            state.active_id = id.clone();
            Ok(id)
        })
        .await
    }

    /// Makes an existing conversation active.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no conversation has the given ID.
    pub async fn select_conversation(&self, conversation_id: &str) -> Result<()> {
        self.update("select_conversation", |state| {
            if !state.contains(conversation_id) {
                return Err(ParleyError::not_found("Conversation", conversation_id));
            }
            state.active_id = conversation_id.to_string();
            Ok(())
        })
        .await
    }

    /// Replaces a conversation title with the trimmed input.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the title is empty or whitespace only
    /// - `NotFound` if no conversation has the given ID
    pub async fn rename_conversation(&self, conversation_id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ParleyError::invalid_input("title must not be blank"));
        }

        self.update("rename_conversation", |state| {
            let conversation = state
                .find_mut(conversation_id)
                .ok_or_else(|| ParleyError::not_found("Conversation", conversation_id))?;
            conversation.title = title.to_string();
            Ok(())
        })
        .await
    }

    /// Deletes a conversation.
    ///
    /// When the deleted conversation was active, the first remaining
    /// conversation in store order becomes active.
    ///
    /// # Errors
    ///
    /// - `LastConversation` if it is the only conversation left
    /// - `NotFound` if no conversation has the given ID
    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        self.update("delete_conversation", |state| {
            let index = state
                .conversations
                .iter()
                .position(|c| c.id == conversation_id)
                .ok_or_else(|| ParleyError::not_found("Conversation", conversation_id))?;
            if state.conversations.len() <= 1 {
                return Err(ParleyError::LastConversation);
            }

            state.conversations.remove(index);
            if state.active_id == conversation_id {
                state.active_id = state.conversations[0].id.clone();
            }
            Ok(())
        })
        .await
    }

    /// Appends a message to the given conversation.
    ///
    /// The first user message of a conversation still carrying the default
    /// title also sets its title.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation no longer exists.
    pub async fn append_message(&self, conversation_id: &str, message: Message) -> Result<()> {
        self.update("append_message", |state| {
            let conversation = state
                .find_mut(conversation_id)
                .ok_or_else(|| ParleyError::not_found("Conversation", conversation_id))?;
            conversation.push(message);
            Ok(())
        })
        .await
    }

    /// Appends a message that consumes the pending image.
    ///
    /// The message lands and the pending image is cleared in one save; if the
    /// save fails neither change is applied.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation no longer exists.
    pub async fn append_with_pending_image(
        &self,
        conversation_id: &str,
        message: Message,
    ) -> Result<()> {
        self.update("append_with_pending_image", |state| {
            let conversation = state
                .find_mut(conversation_id)
                .ok_or_else(|| ParleyError::not_found("Conversation", conversation_id))?;
            conversation.push(message);
            state.current_image_data_url = None;
            Ok(())
        })
        .await
    }

    /// Raises the processing flag.
    ///
    /// # Returns
    ///
    /// The ID of the active conversation at the moment the flag was raised;
    /// the pending reply belongs to it.
    ///
    /// # Errors
    ///
    /// Returns `Busy` if a reply is already in flight.
    pub async fn begin_processing(&self) -> Result<String> {
        self.update("begin_processing", |state| {
            if state.is_processing {
                return Err(ParleyError::Busy);
            }
            state.is_processing = true;
            Ok(state.active_id.clone())
        })
        .await
    }

    /// Clears the processing flag.
    ///
    /// Unlike other mutations this one is committed and published even when
    /// the save fails, so the gate always reopens. A stale flag on disk is
    /// cleared again on the next load.
    pub async fn finish_processing(&self) {
        let mut guard = self.state.lock().await;
        guard.is_processing = false;
        self.snapshots.send_replace(Arc::new(guard.clone()));

        if let Err(e) = self.repository.save(&guard).await {
            tracing::warn!("[ConversationStore] finish_processing not saved: {}", e);
        }
    }

    pub async fn set_image_generation(&self, enabled: bool) -> Result<()> {
        self.update("set_image_generation", |state| {
            state.image_generation_enabled = enabled;
            Ok(())
        })
        .await
    }

    pub async fn set_pending_image(&self, data_url: Option<String>) -> Result<()> {
        self.update("set_pending_image", |state| {
            state.current_image_data_url = data_url;
            Ok(())
        })
        .await
    }

    /// Applies `mutation` to a copy of the state, saves the copy and commits it.
    async fn update<T, F>(&self, operation: &str, mutation: F) -> Result<T>
    where
        F: FnOnce(&mut ChatState) -> Result<T>,
    {
        let mut guard = self.state.lock().await;
        let mut draft = guard.clone();

        let output = mutation(&mut draft).inspect_err(|e| {
            tracing::debug!("[ConversationStore] {} rejected: {}", operation, e);
        })?;

        self.repository.save(&draft).await.inspect_err(|e| {
            tracing::warn!("[ConversationStore] {} not saved: {}", operation, e);
        })?;

        *guard = draft;
        self.snapshots.send_replace(Arc::new(guard.clone()));
        tracing::debug!(
            "[ConversationStore] {} committed: active={}, conversations={}",
            operation,
            guard.active_id,
            guard.conversations.len()
        );

        Ok(output)
    }
}

//! Chat use case.
//!
//! Ties the composer, the conversation store and the reply backend together.
//! Presentation layers call into `ChatUseCase` and redraw from store
//! snapshots; they never mutate the store directly.

use parley_core::composer::{ComposerAction, ComposerState, PendingImage};
use parley_core::conversation::{Message, MessageMetadata};
use parley_core::error::{ParleyError, Result};
use parley_core::notice::Notice;
use parley_core::reply::{ReplyBackend, ReplyKind, ReplyRequest};
use parley_core::state::ChatState;
use parley_core::store::ConversationStore;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

pub const VOICE_RECORDING_NOTICE: &str = "Voice recording feature would be activated here";
pub const TTS_NOTICE: &str = "Text-to-speech would play here";
pub const NO_AI_MESSAGE: &str = "No AI message to play";

/// Use case for everything the chat window can do.
///
/// # Responsibilities
///
/// - Routing composer sends to text, image analysis or image generation
/// - Scheduling replies against the conversation that was active at send time
/// - Keeping the composer and the persisted composer flags in sync
/// - Conversation management with user-facing notices
pub struct ChatUseCase {
    store: Arc<ConversationStore>,
    /// Transient input-box state; shared with reply tasks
    composer: Arc<Mutex<ComposerState>>,
    backend: Arc<dyn ReplyBackend>,
}

impl ChatUseCase {
    /// Creates the use case, restoring composer flags from the store.
    pub fn new(store: Arc<ConversationStore>, backend: Arc<dyn ReplyBackend>) -> Self {
        let snapshot = store.snapshot();
        let composer = ComposerState {
            draft: String::new(),
            pending_image: snapshot
                .current_image_data_url
                .clone()
                .map(PendingImage::from_data_url),
            image_generation: snapshot.image_generation_enabled,
        };

        Self {
            store,
            composer: Arc::new(Mutex::new(composer)),
            backend,
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    pub fn snapshot(&self) -> Arc<ChatState> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ChatState>> {
        self.store.subscribe()
    }

    pub async fn composer(&self) -> ComposerState {
        self.composer.lock().await.clone()
    }

    // ============================================================================
    // Composer
    // ============================================================================

    pub async fn set_draft(&self, draft: impl Into<String>) {
        self.composer.lock().await.set_draft(draft);
    }

    pub async fn attach_image(&self, image: PendingImage) -> Result<()> {
        let mut composer = self.composer.lock().await;
        self.store
            .set_pending_image(Some(image.data_url.clone()))
            .await?;
        composer.attach_image(image);
        Ok(())
    }

    pub async fn clear_image(&self) -> Result<()> {
        let mut composer = self.composer.lock().await;
        self.store.set_pending_image(None).await?;
        composer.clear_image();
        Ok(())
    }

    /// Flips image-generation mode and returns the new value.
    pub async fn toggle_image_generation(&self) -> Result<bool> {
        let mut composer = self.composer.lock().await;
        let enabled = !composer.image_generation;
        self.store.set_image_generation(enabled).await?;
        composer.image_generation = enabled;
        Ok(enabled)
    }

    /// Sends the current draft.
    ///
    /// Returns `Ok(None)` without changing anything when the draft is blank
    /// or a reply is pending. Otherwise the user message is appended to the
    /// active conversation and the handle of the scheduled reply is returned.
    /// If the user message cannot be stored the composer is restored.
    pub async fn send(&self) -> Result<Option<JoinHandle<()>>> {
        let mut composer = self.composer.lock().await;
        if !composer.can_send(self.store.snapshot().is_processing) {
            return Ok(None);
        }

        let conversation_id = match self.store.begin_processing().await {
            Ok(id) => id,
            Err(ParleyError::Busy) => return Ok(None),
            Err(e) => return Err(e),
        };

        let before = composer.clone();
        let Some(action) = composer.send(false) else {
            self.release(&conversation_id).await;
            return Ok(None);
        };

        match self.dispatch(&conversation_id, action).await {
            Ok(kind) => Ok(Some(self.schedule(conversation_id, kind))),
            Err(e) => {
                *composer = before;
                self.release(&conversation_id).await;
                Err(e)
            }
        }
    }

    /// Appends the user side of an action and returns the reply to request.
    async fn dispatch(&self, conversation_id: &str, action: ComposerAction) -> Result<ReplyKind> {
        match action {
            ComposerAction::Text { text } => {
                self.store
                    .append_message(conversation_id, Message::user(text.clone()))
                    .await?;
                Ok(ReplyKind::Text { prompt: text })
            }
            ComposerAction::AnalyzeImage { prompt, image } => {
                let message =
                    Message::user(prompt.clone()).with_meta(MessageMetadata::attached_image());
                self.store
                    .append_with_pending_image(conversation_id, message)
                    .await?;
                Ok(ReplyKind::ImageAnalysis { prompt, image })
            }
            ComposerAction::GenerateImage { prompt } => {
                let message = Message::user(format!("Generate image: {}", prompt));
                self.store.append_message(conversation_id, message).await?;
                Ok(ReplyKind::ImageGeneration { prompt })
            }
        }
    }

    // ============================================================================
    // Replies
    // ============================================================================

    /// Schedules a text reply into the active conversation.
    pub async fn simulate_text_reply(&self, prompt: impl Into<String>) -> Result<JoinHandle<()>> {
        let conversation_id = self.store.begin_processing().await?;
        Ok(self.schedule(
            conversation_id,
            ReplyKind::Text {
                prompt: prompt.into(),
            },
        ))
    }

    /// Schedules an image-analysis reply into the active conversation.
    pub async fn simulate_image_analysis_reply(
        &self,
        prompt: impl Into<String>,
        image: PendingImage,
    ) -> Result<JoinHandle<()>> {
        let conversation_id = self.store.begin_processing().await?;
        Ok(self.schedule(
            conversation_id,
            ReplyKind::ImageAnalysis {
                prompt: prompt.into(),
                image,
            },
        ))
    }

    /// Schedules an image-generation reply into the active conversation.
    pub async fn simulate_image_generation_reply(
        &self,
        prompt: impl Into<String>,
    ) -> Result<JoinHandle<()>> {
        let conversation_id = self.store.begin_processing().await?;
        Ok(self.schedule(
            conversation_id,
            ReplyKind::ImageGeneration {
                prompt: prompt.into(),
            },
        ))
    }

    /// Runs the backend on a task. The caller must hold the processing gate
    /// for `conversation_id`; the task releases it.
    fn schedule(&self, conversation_id: String, kind: ReplyKind) -> JoinHandle<()> {
        let store = self.store.clone();
        let composer = self.composer.clone();
        let backend = self.backend.clone();
        let ends_generation = matches!(kind, ReplyKind::ImageGeneration { .. });

        tracing::debug!(
            "[ChatUseCase] Scheduling {} reply for {}",
            kind.label(),
            conversation_id
        );

        tokio::spawn(async move {
            let request = ReplyRequest {
                conversation_id: conversation_id.clone(),
                kind,
            };

            match backend.reply(request).await {
                Ok(reply) => {
                    match store
                        .append_message(&reply.conversation_id, reply.message)
                        .await
                    {
                        Ok(()) => {}
                        Err(e) if e.is_not_found() => tracing::info!(
                            "[ChatUseCase] Conversation {} is gone, dropping reply",
                            reply.conversation_id
                        ),
                        Err(e) => tracing::warn!("[ChatUseCase] Failed to store reply: {}", e),
                    }
                }
                Err(e) => tracing::warn!("[ChatUseCase] Reply backend failed: {}", e),
            }

            if ends_generation {
                let mut composer = composer.lock().await;
                match store.set_image_generation(false).await {
                    Ok(()) => composer.image_generation = false,
                    Err(e) => tracing::warn!(
                        "[ChatUseCase] Failed to leave image generation mode: {}",
                        e
                    ),
                }
            }

            store.finish_processing().await;
            tracing::debug!("[ChatUseCase] Reply for {} finished", conversation_id);
        })
    }

    async fn release(&self, conversation_id: &str) {
        self.store.finish_processing().await;
        tracing::debug!("[ChatUseCase] Released {} without a reply", conversation_id);
    }

    // ============================================================================
    // Conversations
    // ============================================================================

    pub async fn new_chat(&self) -> Result<Notice> {
        self.store.create_conversation().await?;
        Ok(Notice::success("New chat created"))
    }

    pub async fn select_chat(&self, conversation_id: &str) -> Result<()> {
        self.store.select_conversation(conversation_id).await
    }

    pub async fn rename_chat(&self, conversation_id: &str, title: &str) -> Result<Notice> {
        self.store.rename_conversation(conversation_id, title).await?;
        Ok(Notice::success("Chat renamed"))
    }

    pub async fn delete_chat(&self, conversation_id: &str) -> Result<Notice> {
        self.store.delete_conversation(conversation_id).await?;
        Ok(Notice::success("Chat deleted"))
    }

    // ============================================================================
    // Voice
    // ============================================================================

    pub fn record_voice(&self) -> Notice {
        Notice::info(VOICE_RECORDING_NOTICE)
    }

    /// Reads out the latest assistant message of the active conversation.
    pub fn play_tts(&self) -> Notice {
        let snapshot = self.store.snapshot();
        let has_reply = snapshot
            .active()
            .map(|c| c.last_assistant_message().is_some())
            .unwrap_or(false);

        if has_reply {
            Notice::info(TTS_NOTICE)
        } else {
            Notice::error(NO_AI_MESSAGE)
        }
    }
}

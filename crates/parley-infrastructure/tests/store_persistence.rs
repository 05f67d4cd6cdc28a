//! ConversationStore backed by the JSON file repository.

use parley_core::conversation::{DEFAULT_TITLE, Message};
use parley_core::store::ConversationStore;
use parley_infrastructure::{JsonStateRepository, ParleyPaths};
use std::sync::Arc;
use tempfile::TempDir;

async fn open(paths: &ParleyPaths) -> ConversationStore {
    ConversationStore::open(Arc::new(JsonStateRepository::new(paths.state_file()))).await
}

#[tokio::test]
async fn test_conversations_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ParleyPaths::rooted_at(temp_dir.path());

    let (first, second) = {
        let store = open(&paths).await;
        let first = store.snapshot().active_id.clone();
        store
            .append_message(&first, Message::user("Plan a trip to Kyoto next spring please"))
            .await
            .unwrap();
        let second = store.create_conversation().await.unwrap();
        (first, second)
    };

    let reopened = open(&paths).await;
    let state = reopened.snapshot();
    assert_eq!(state.conversations.len(), 2);
    assert_eq!(state.active_id, second);
    assert_eq!(
        state.find(&first).unwrap().title,
        "Plan a trip to Kyoto..."
    );
    assert_eq!(state.find(&second).unwrap().title, DEFAULT_TITLE);
}

#[tokio::test]
async fn test_processing_flag_is_cleared_on_restart() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ParleyPaths::rooted_at(temp_dir.path());

    {
        let store = open(&paths).await;
        store.begin_processing().await.unwrap();
        assert!(store.snapshot().is_processing);
    }

    assert!(!open(&paths).await.snapshot().is_processing);
}

#[tokio::test]
async fn test_corrupt_state_file_starts_fresh() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ParleyPaths::rooted_at(temp_dir.path());
    std::fs::write(paths.state_file(), "{\"conversations\": oops").unwrap();

    let store = open(&paths).await;
    let state = store.snapshot();
    assert_eq!(state.conversations.len(), 1);
    assert_eq!(state.active().unwrap().title, DEFAULT_TITLE);

    store.create_conversation().await.unwrap();
    let raw = std::fs::read_to_string(paths.state_file()).unwrap();
    assert!(raw.contains("\"activeId\""));
}

#[tokio::test]
async fn test_empty_conversation_list_is_discarded() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ParleyPaths::rooted_at(temp_dir.path());
    std::fs::write(
        paths.state_file(),
        r#"{"conversations": [], "activeId": "c_gone"}"#,
    )
    .unwrap();

    let state = open(&paths).await.snapshot();
    assert_eq!(state.conversations.len(), 1);
    assert!(state.contains(&state.active_id));
}

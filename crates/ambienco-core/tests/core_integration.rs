#![allow(clippy::unwrap_used, clippy::expect_used)]

use ambienco_core::*;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// 1. Conversation persistence shape
// ---------------------------------------------------------------------------

#[test]
fn conversation_serialization_roundtrip() {
    let session_id = Uuid::new_v4();
    let mut conv = Conversation::new(session_id);
    conv.user_info.insert(
        "language".to_string(),
        serde_json::Value::String("en-US".to_string()),
    );
    conv.push(ChatMessage::user("What are the benefits of LED lighting?"));
    conv.push(ChatMessage::assistant("LED lighting offers incredible benefits!"));

    let json = serde_json::to_value(&conv).unwrap();
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["messages"][1]["role"], "assistant");

    let restored: Conversation = serde_json::from_value(json).unwrap();
    assert_eq!(restored.session_id, session_id);
    assert_eq!(restored.message_count(), 2);
    assert_eq!(
        restored.user_info.get("language"),
        Some(&serde_json::Value::String("en-US".to_string()))
    );
}

#[test]
fn widget_history_without_ids_is_accepted() {
    let json = serde_json::json!({
        "session_id": Uuid::new_v4(),
        "messages": [
            {"type": "user", "content": "hello"},
            {"type": "assistant", "content": "hi", "helpful": true}
        ],
        "created_at": "2024-05-01T10:00:00Z",
        "last_updated": "2024-05-01T10:00:05Z"
    });
    let conv: Conversation = serde_json::from_value(json).unwrap();
    assert_eq!(conv.messages.len(), 2);
    assert!(conv.messages[1].helpful);
    assert_ne!(conv.messages[0].id, conv.messages[1].id);
}

// ---------------------------------------------------------------------------
// 2. Error Display and From impls
// ---------------------------------------------------------------------------

#[test]
fn error_display_and_from_impls() {
    let err = AmbiencoError::Validation("title is required".to_string());
    assert_eq!(err.to_string(), "Validation error: title is required");

    let err = AmbiencoError::Unauthorized("token expired".to_string());
    assert_eq!(err.to_string(), "Unauthorized: token expired");

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: AmbiencoError = io.into();
    assert!(err.to_string().starts_with("IO error:"));
}

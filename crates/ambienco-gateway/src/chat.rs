//! Assistant chat over HTTP, plus transcript storage and analytics.

use crate::analytics::{summarize, ChatAnalytics};
use crate::error::{ok, ok_message, ApiResult};
use crate::middleware::AdminSession;
use crate::records::{chat_key, AskRequest, FeedbackRequest, SaveConversation, CHAT_PREFIX};
use crate::server::AppState;
use ambienco_assistant::{Assistant, AssistantReply};
use ambienco_core::{AmbiencoError, AmbiencoResult, ChatMessage, Conversation};
use ambienco_security::Sanitizer;
use ambienco_store::{KvStore, KvStoreExt};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// One answered question.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    /// Session the turn was recorded under.
    pub session_id: Uuid,
    /// Id of the stored assistant answer, for feedback.
    pub message_id: Uuid,
    /// The answer.
    pub reply: AssistantReply,
}

/// Answers questions and keeps one transcript per chat session.
pub struct ChatService {
    assistant: Assistant,
    store: Arc<dyn KvStore>,
    sanitizer: Sanitizer,
}

impl ChatService {
    /// Service answering with `assistant` and storing transcripts in `store`.
    pub fn new(assistant: Assistant, store: Arc<dyn KvStore>, sanitizer: Sanitizer) -> Self {
        Self {
            assistant,
            store,
            sanitizer,
        }
    }

    /// The underlying assistant.
    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// Answer `message` and append both turns to the session's transcript.
    ///
    /// Blank messages are rejected. A missing `session_id` starts a new
    /// session.
    pub async fn ask(&self, session_id: Option<Uuid>, message: &str) -> AmbiencoResult<ChatTurn> {
        let question = self
            .sanitizer
            .sanitize(message)
            .into_result()
            .map_err(AmbiencoError::Validation)?;
        if question.trim().is_empty() {
            return Err(AmbiencoError::Validation(
                "Message must not be empty".to_string(),
            ));
        }

        let session_id = session_id.unwrap_or_else(Uuid::new_v4);
        let reply = self.assistant.reply(&question);

        let answer = ChatMessage::assistant(reply.response.clone());
        let message_id = answer.id;
        let mut turn = vec![ChatMessage::user(question), answer];
        if let Some(follow_up) = reply.follow_up_message() {
            turn.push(ChatMessage::assistant(follow_up));
        }
        self.store
            .update_as(&chat_key(session_id), |current: Option<Conversation>| {
                let mut conversation = current.unwrap_or_else(|| Conversation::new(session_id));
                for message in turn {
                    conversation.push(message);
                }
                Ok(conversation)
            })
            .await?;

        debug!(session_id = %session_id, matched = reply.matched, "Question answered");
        Ok(ChatTurn {
            session_id,
            message_id,
            reply,
        })
    }

    /// Stored transcript of `session_id`.
    pub async fn load(&self, session_id: Uuid) -> AmbiencoResult<Option<Conversation>> {
        self.store.get_as(&chat_key(session_id)).await
    }

    /// Upsert a transcript sent by the widget. Repeated saves for one
    /// session overwrite the same record.
    pub async fn save_conversation(&self, body: SaveConversation) -> AmbiencoResult<Conversation> {
        let session_id = body.session_id.unwrap_or_else(Uuid::new_v4);
        let conversation: Conversation = self
            .store
            .update_as(&chat_key(session_id), |current: Option<Conversation>| {
                let mut conversation = current.unwrap_or_else(|| Conversation::new(session_id));
                conversation.replace_messages(body.messages);
                conversation.user_info.extend(body.user_info);
                Ok(conversation)
            })
            .await?;
        info!(session_id = %session_id, messages = conversation.message_count(), "Conversation saved");
        Ok(conversation)
    }

    /// Mark one assistant answer as helpful.
    pub async fn mark_helpful(&self, session_id: Uuid, message_id: Uuid) -> AmbiencoResult<()> {
        self.store
            .update_as(&chat_key(session_id), |current: Option<Conversation>| {
                let mut conversation = current.ok_or_else(|| {
                    AmbiencoError::NotFound("Conversation not found".to_string())
                })?;
                if !conversation.mark_helpful(message_id) {
                    return Err(AmbiencoError::NotFound("Message not found".to_string()));
                }
                Ok(conversation)
            })
            .await?;
        Ok(())
    }

    /// Aggregate statistics over every stored transcript.
    pub async fn analytics(&self) -> AmbiencoResult<ChatAnalytics> {
        let conversations: Vec<Conversation> = self.store.get_by_prefix_as(CHAT_PREFIX).await?;
        Ok(summarize(&conversations))
    }
}

pub(crate) async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(body) = payload?;
    let turn = state.chat.ask(body.session_id, &body.message).await?;
    ok(turn)
}

pub(crate) async fn quick_questions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    ok(state.chat.assistant().quick_questions())
}

pub(crate) async fn save_conversation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveConversation>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(body) = payload?;
    let conversation = state.chat.save_conversation(body).await?;
    ok(serde_json::json!({"session_id": conversation.session_id}))
}

pub(crate) async fn feedback(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(body) = payload?;
    state.chat.mark_helpful(session_id, body.message_id).await?;
    Ok(ok_message("Thanks for your feedback"))
}

pub(crate) async fn analytics(
    _admin: AdminSession,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    ok(state.chat.analytics().await?)
}

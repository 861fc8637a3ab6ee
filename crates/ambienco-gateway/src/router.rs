use crate::chat::ChatService;
use crate::connection::ConnectionManager;
use ambienco_assistant::Pacing;
use ambienco_core::{AmbiencoError, AmbiencoResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// A question sent over the chat socket. Plain-text frames are wrapped into
/// this shape by the socket handler.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    /// Overrides the socket's session.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// The visitor's question.
    pub content: String,
}

/// Frames sent to the chat widget.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// First frame on every socket.
    Connected {
        /// Session the socket records turns under.
        session_id: Uuid,
        /// Socket id.
        connection_id: Uuid,
        /// Opening message.
        greeting: String,
        /// Suggested opening questions.
        quick_questions: Vec<String>,
    },
    /// The answer to a question.
    Response {
        /// Session the turn was recorded under.
        session_id: Uuid,
        /// Stored answer id, for feedback.
        message_id: Uuid,
        /// Answer text.
        content: String,
        /// Whether a knowledge entry matched.
        matched: bool,
        /// Category of the matched entry.
        #[serde(skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
    /// Suggestions sent after the answer.
    FollowUps {
        /// Session the turn was recorded under.
        session_id: Uuid,
        /// Rendered suggestion message.
        content: String,
        /// The suggested questions.
        follow_ups: Vec<String>,
    },
    /// The question could not be answered.
    Error {
        /// Session the question was sent under.
        session_id: Uuid,
        /// Reason shown to the visitor.
        content: String,
    },
}

impl OutboundMessage {
    /// Serialized frame text.
    pub fn to_json(&self) -> AmbiencoResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Answers socket questions and paces the replies.
pub struct ChatRouter {
    chat: Arc<ChatService>,
    connections: Arc<ConnectionManager>,
    pacing: Pacing,
}

impl ChatRouter {
    /// Router answering through `chat` and writing to `connections`.
    pub fn new(chat: Arc<ChatService>, connections: Arc<ConnectionManager>, pacing: Pacing) -> Self {
        Self {
            chat,
            connections,
            pacing,
        }
    }

    /// The first frame for a new socket.
    pub fn welcome(&self, session_id: Uuid, connection_id: Uuid) -> OutboundMessage {
        let assistant = self.chat.assistant();
        OutboundMessage::Connected {
            session_id,
            connection_id,
            greeting: assistant.greeting().to_string(),
            quick_questions: assistant.quick_questions().to_vec(),
        }
    }

    /// Answer one question: the response after the response delay, then the
    /// follow-ups after the follow-up delay. Without an explicit session id
    /// the question belongs to the session the socket was opened for.
    pub async fn handle_message(
        &self,
        msg: InboundMessage,
        connection_id: Uuid,
    ) -> AmbiencoResult<()> {
        let session_id = match msg.session_id {
            Some(session_id) => session_id,
            None => self
                .connections
                .session_of(connection_id)
                .await
                .ok_or_else(|| {
                    AmbiencoError::Gateway(format!("Unknown connection {connection_id}"))
                })?,
        };

        let turn = match self.chat.ask(Some(session_id), &msg.content).await {
            Ok(turn) => turn,
            Err(AmbiencoError::Validation(reason)) => {
                warn!(connection_id = %connection_id, "Rejected chat message: {reason}");
                let error = OutboundMessage::Error {
                    session_id,
                    content: reason,
                };
                self.connections.send_to(connection_id, &error.to_json()?).await;
                return Ok(());
            }
            Err(e) => {
                let error = OutboundMessage::Error {
                    session_id,
                    content: "Sorry, something went wrong. Please try again.".to_string(),
                };
                self.connections.send_to(connection_id, &error.to_json()?).await;
                return Err(e);
            }
        };

        info!(session_id = %session_id, matched = turn.reply.matched, "Routing answer to socket");
        tokio::time::sleep(self.pacing.next_response_delay()).await;

        let follow_up = turn.reply.follow_up_message();
        let response = OutboundMessage::Response {
            session_id,
            message_id: turn.message_id,
            content: turn.reply.response,
            matched: turn.reply.matched,
            category: turn.reply.category,
        };
        if !self.connections.send_to(connection_id, &response.to_json()?).await {
            return Ok(());
        }

        if let Some(content) = follow_up {
            tokio::time::sleep(self.pacing.follow_up_delay).await;
            let follow_ups = OutboundMessage::FollowUps {
                session_id,
                content,
                follow_ups: turn.reply.follow_ups,
            };
            self.connections
                .send_to(connection_id, &follow_ups.to_json()?)
                .await;
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use ambienco_assistant::Assistant;
    use ambienco_security::Sanitizer;
    use ambienco_store::InMemoryKvStore;
    use serde_json::Value;
    use tokio::sync::mpsc;

    async fn setup() -> (ChatRouter, mpsc::UnboundedReceiver<String>, Uuid, Uuid) {
        let chat = Arc::new(ChatService::new(
            Assistant::builtin(),
            Arc::new(InMemoryKvStore::new()),
            Sanitizer::default(),
        ));
        let connections = ConnectionManager::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        connections
            .add(Connection {
                id: connection_id,
                session_id,
                tx,
            })
            .await;
        let router = ChatRouter::new(chat, connections, Pacing::immediate());
        (router, rx, connection_id, session_id)
    }

    fn frame(raw: String) -> Value {
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_outbound_frames_are_tagged() {
        let msg = OutboundMessage::Error {
            session_id: Uuid::nil(),
            content: "nope".to_string(),
        };
        let json = frame(msg.to_json().unwrap());
        assert_eq!(json["type"], "error");
        assert_eq!(json["content"], "nope");
    }

    #[tokio::test]
    async fn test_matched_question_sends_response_then_follow_ups() {
        let (router, mut rx, connection_id, session_id) = setup().await;
        let msg = InboundMessage {
            session_id: None,
            content: "Tell me about warranty".to_string(),
        };
        router
            .handle_message(msg, connection_id)
            .await
            .unwrap();

        let response = frame(rx.recv().await.unwrap());
        assert_eq!(response["type"], "response");
        assert_eq!(response["category"], "Quality & Warranty");
        assert_eq!(response["session_id"], session_id.to_string());

        let follow_ups = frame(rx.recv().await.unwrap());
        assert_eq!(follow_ups["type"], "follow_ups");
        assert_eq!(follow_ups["follow_ups"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unmatched_question_sends_only_default() {
        let (router, mut rx, connection_id, _session_id) = setup().await;
        let msg = InboundMessage {
            session_id: None,
            content: "xyz".to_string(),
        };
        router
            .handle_message(msg, connection_id)
            .await
            .unwrap();

        let response = frame(rx.recv().await.unwrap());
        assert_eq!(response["matched"], false);
        assert!(response.get("category").is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_blank_question_gets_error_frame() {
        let (router, mut rx, connection_id, _session_id) = setup().await;
        let msg = InboundMessage {
            session_id: None,
            content: "  ".to_string(),
        };
        router
            .handle_message(msg, connection_id)
            .await
            .unwrap();
        assert_eq!(frame(rx.recv().await.unwrap())["type"], "error");
    }

    #[tokio::test]
    async fn test_explicit_session_overrides_socket_session() {
        let (router, mut rx, connection_id, session_id) = setup().await;
        let other = Uuid::new_v4();
        let msg = InboundMessage {
            session_id: Some(other),
            content: "outdoor flood lights".to_string(),
        };
        router.handle_message(msg, connection_id).await.unwrap();

        let response = frame(rx.recv().await.unwrap());
        assert_eq!(response["session_id"], other.to_string());
        assert_ne!(response["session_id"], session_id.to_string());
    }

    #[tokio::test]
    async fn test_unknown_connection_is_gateway_error() {
        let (router, _rx, _connection_id, _session_id) = setup().await;
        let msg = InboundMessage {
            session_id: None,
            content: "warranty".to_string(),
        };
        let err = router
            .handle_message(msg, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AmbiencoError::Gateway(_)));
    }
}

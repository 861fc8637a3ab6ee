use crate::chat::ChatService;
use crate::connection::{Connection, ConnectionManager};
use crate::error::ApiError;
use crate::middleware::rate_limit_middleware;
use crate::router::{ChatRouter, InboundMessage};
use crate::{admin, catalog, chat, forum, leads};
use ambienco_assistant::{Assistant, Pacing};
use ambienco_security::{AdminAuth, RateLimiter, Sanitizer};
use ambienco_store::KvStore;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{header, Method},
    middleware as axum_mw,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

/// Shared application state.
pub struct AppState {
    /// Record storage.
    pub store: Arc<dyn KvStore>,
    /// Assistant and transcripts.
    pub chat: Arc<ChatService>,
    /// Admin login and tokens.
    pub auth: Arc<AdminAuth>,
    /// Applied to every visitor-supplied string.
    pub sanitizer: Sanitizer,
    /// Open chat sockets.
    pub connections: Arc<ConnectionManager>,
    /// Socket question handling.
    pub router: Arc<ChatRouter>,
}

/// Tunables for [`GatewayServer::build_with_options`].
#[derive(Clone)]
pub struct GatewayOptions {
    /// Per-client limiter; `None` disables rate limiting.
    pub rate_limiter: Option<Arc<RateLimiter>>,
    /// Delays applied to socket replies.
    pub pacing: Pacing,
    /// Longest accepted visitor text, in bytes.
    pub max_message_length: usize,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            rate_limiter: None,
            pacing: Pacing::immediate(),
            max_message_length: 10_000,
        }
    }
}

/// The main gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Build the gateway without rate limiting and with immediate replies.
    pub fn build(store: Arc<dyn KvStore>, assistant: Assistant, auth: Arc<AdminAuth>) -> Router {
        Self::build_with_options(store, assistant, auth, GatewayOptions::default())
    }

    /// Build the gateway with the given options.
    pub fn build_with_options(
        store: Arc<dyn KvStore>,
        assistant: Assistant,
        auth: Arc<AdminAuth>,
        options: GatewayOptions,
    ) -> Router {
        let connections = ConnectionManager::new();
        let chat = Arc::new(ChatService::new(
            assistant,
            store.clone(),
            Sanitizer::new(options.max_message_length),
        ));
        let router = Arc::new(ChatRouter::new(
            chat.clone(),
            connections.clone(),
            options.pacing,
        ));

        let state = Arc::new(AppState {
            store,
            chat,
            auth,
            sanitizer: Sanitizer::new(options.max_message_length),
            connections,
            router,
        });

        let app = Router::new()
            .route("/health", get(health_handler))
            .route("/ws", get(ws_handler))
            .route(
                "/products",
                get(catalog::list_products).post(catalog::create_product),
            )
            .route(
                "/products/{key}",
                get(catalog::list_by_category)
                    .put(catalog::update_product)
                    .delete(catalog::delete_product),
            )
            .route("/product/{id}", get(catalog::get_product))
            .route("/forum/posts", get(forum::list_posts).post(forum::create_post))
            .route("/forum/posts/{id}/replies", post(forum::add_reply))
            .route("/forum/posts/{id}/like", post(forum::like_post))
            .route("/contact", post(leads::submit_contact))
            .route("/contacts", get(leads::list_contacts))
            .route("/contacts/{id}/status", put(leads::update_contact_status))
            .route("/product-inquiry", post(leads::submit_inquiry))
            .route("/inquiries", get(leads::list_inquiries))
            .route("/inquiries/{id}/status", put(leads::update_inquiry_status))
            .route("/assistant/ask", post(chat::ask))
            .route("/assistant/quick-questions", get(chat::quick_questions))
            .route("/chat/conversation", post(chat::save_conversation))
            .route(
                "/chat/conversation/{session_id}/feedback",
                post(chat::feedback),
            )
            .route("/chat/analytics", get(chat::analytics))
            .route("/admin/login", post(admin::login))
            .route("/admin/logout", post(admin::logout))
            .fallback(not_found_handler)
            .with_state(state);

        let app = match options.rate_limiter {
            Some(limiter) => app.layer(axum_mw::from_fn_with_state(limiter, rate_limit_middleware)),
            None => app,
        };

        app.layer(TraceLayer::new_for_http()).layer(cors_layer())
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "ambienco",
        "timestamp": chrono::Utc::now(),
        "connections": state.connections.connection_count().await,
    }))
}

async fn not_found_handler() -> ApiError {
    ApiError::not_found("Not found")
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let session_id = Uuid::new_v4();
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Channel for sending messages back to the WebSocket
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let conn = Connection {
        id: connection_id,
        session_id,
        tx,
    };
    state.connections.add(conn).await;

    info!(
        connection_id = %connection_id,
        session_id = %session_id,
        "WebSocket connected"
    );

    match state.router.welcome(session_id, connection_id).to_json() {
        Ok(welcome) => {
            state.connections.send_to(connection_id, &welcome).await;
        }
        Err(e) => error!(error = %e, "Failed to encode welcome frame"),
    }

    use futures_util::SinkExt;
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    use futures_util::StreamExt;
    let router = state.router.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let inbound: InboundMessage = match serde_json::from_str(&text) {
                        Ok(m) => m,
                        Err(_) => InboundMessage {
                            session_id: None,
                            content: text.to_string(),
                        },
                    };

                    if let Err(e) = router.handle_message(inbound, connection_id).await {
                        error!(error = %e, "Failed to handle message");
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    state.connections.remove(connection_id).await;
    info!(connection_id = %connection_id, "WebSocket disconnected");
}

//! HTTP and WebSocket gateway for the Ambienco site.
//!
//! Serves the product catalog, the community forum, the contact and inquiry
//! forms, the lighting assistant (REST and WebSocket) and the admin
//! endpoints, all over one [`axum::Router`] built by [`GatewayServer`].

/// Admin login and logout.
mod admin;
/// Chat transcript statistics.
pub mod analytics;
/// Product catalog handlers.
mod catalog;
/// Assistant service and chat handlers.
pub mod chat;
/// Open WebSocket connections.
pub mod connection;
/// Error envelope and status mapping.
pub mod error;
/// Forum handlers.
mod forum;
/// Contact and inquiry handlers.
mod leads;
/// Admin extractor and rate limiting.
pub mod middleware;
/// Stored records and request bodies.
pub mod records;
/// Socket question handling.
pub mod router;
/// Router assembly and the socket loop.
pub mod server;

pub use chat::{ChatService, ChatTurn};
pub use error::{ApiError, ApiResult};
pub use server::{AppState, GatewayOptions, GatewayServer};

//! Core types and error definitions for the Ambienco services.
//!
//! This crate provides the foundational types shared across all Ambienco
//! crates: the unified error enum and the chat transcript records written by
//! the assistant widget.
//!
//! # Main types
//!
//! - [`AmbiencoError`]: Unified error enum for all Ambienco subsystems.
//! - [`AmbiencoResult`]: Convenience alias for `Result<T, AmbiencoError>`.
//! - [`Role`]: Chat message author (user or assistant).
//! - [`ChatMessage`]: A single turn of an assistant conversation.
//! - [`Conversation`]: The persisted transcript of one chat session.

/// Chat transcript records.
pub mod conversation;

pub use conversation::{ChatMessage, Conversation, Role};

// --- Error types ---

/// Top-level error type for the Ambienco services.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum AmbiencoError {
    /// A key-value store read or write failed.
    #[error("Store error: {0}")]
    Store(String),

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request body or configuration value failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, invalid or expired admin credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A security-related error (rate limiting, rejected input).
    #[error("Security error: {0}")]
    Security(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the assistant (corpus loading, reply composition).
    #[error("Assistant error: {0}")]
    Assistant(String),

    /// An error from the HTTP gateway layer.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`AmbiencoError`].
pub type AmbiencoResult<T> = Result<T, AmbiencoError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AmbiencoError::NotFound("product lighting-1".to_string());
        assert_eq!(err.to_string(), "Not found: product lighting-1");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AmbiencoError = parse.unwrap_err().into();
        assert!(matches!(err, AmbiencoError::Json(_)));
    }
}

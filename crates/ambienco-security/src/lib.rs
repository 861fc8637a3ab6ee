//! Security primitives for the Ambienco gateway.
//!
//! Provides rate limiting, input sanitization and server-side admin
//! authentication.
//!
//! # Main types
//!
//! - [`RateLimiter`]: Token-bucket rate limiter keyed by client.
//! - [`Sanitizer`]: Input sanitization utilities.
//! - [`AdminAuth`]: Credential verification and bearer-token sessions.

/// Admin credential checks and token sessions.
pub mod auth;
/// Token-bucket rate limiting.
pub mod rate_limit;
/// Input sanitization utilities.
pub mod sanitizer;

pub use auth::{hash_password, AdminAuth, AdminCredentials, AdminToken};
pub use rate_limit::RateLimiter;
pub use sanitizer::{SanitizeResult, Sanitizer};

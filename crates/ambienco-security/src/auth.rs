//! Server-side admin authentication.
//!
//! The admin dashboard logs in with a username and password; the password is
//! checked against a configured SHA-256 hash and, on success, an opaque
//! bearer token with a fixed lifetime is issued. Admin-only routes accept
//! only live tokens.

use ambienco_core::{AmbiencoError, AmbiencoResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Hex-encoded SHA-256 of `password`, as stored in the config.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// The single admin account.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminCredentials {
    /// Login name.
    pub username: String,
    /// Hex-encoded SHA-256 of the password.
    pub password_sha256: String,
}

/// A bearer token handed to the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminToken {
    /// Opaque 64-character hex token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Verifies admin credentials and tracks issued tokens.
pub struct AdminAuth {
    credentials: Option<AdminCredentials>,
    ttl: Duration,
    tokens: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl AdminAuth {
    /// `credentials = None` disables admin login entirely.
    pub fn new(credentials: Option<AdminCredentials>, ttl: Duration) -> Self {
        Self {
            credentials,
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Returns true if an admin account is configured.
    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// Check a username/password pair against the configured account.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let Some(creds) = &self.credentials else {
            return false;
        };
        let user_ok = constant_time_eq(creds.username.as_bytes(), username.as_bytes());
        let hash = hash_password(password);
        let pass_ok = constant_time_eq(
            creds.password_sha256.to_lowercase().as_bytes(),
            hash.as_bytes(),
        );
        user_ok & pass_ok
    }

    /// Verify credentials and issue a fresh token.
    pub async fn login(&self, username: &str, password: &str) -> AmbiencoResult<AdminToken> {
        if !self.verify(username, password) {
            warn!("Admin login rejected");
            return Err(AmbiencoError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let token = generate_token()?;
        let expires_at = Utc::now() + self.ttl;
        self.tokens.write().await.insert(token.clone(), expires_at);
        info!(%expires_at, "Admin session started");
        Ok(AdminToken { token, expires_at })
    }

    /// Accept a live token; unknown and expired tokens are rejected.
    pub async fn validate(&self, token: &str) -> AmbiencoResult<()> {
        let expires_at = self.tokens.read().await.get(token).copied();
        match expires_at {
            Some(at) if at > Utc::now() => Ok(()),
            Some(_) => {
                self.tokens.write().await.remove(token);
                Err(AmbiencoError::Unauthorized("Session expired".to_string()))
            }
            None => Err(AmbiencoError::Unauthorized("Invalid token".to_string())),
        }
    }

    /// End a session. Returns `false` if the token was not live.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }

    /// Drop expired tokens, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, expires_at| *expires_at > now);
        before - tokens.len()
    }

    /// Number of live and not-yet-purged tokens.
    pub async fn active_sessions(&self) -> usize {
        self.tokens.read().await.len()
    }
}

fn generate_token() -> AmbiencoResult<String> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| AmbiencoError::Security(format!("Token generation failed: {e}")))?;
    Ok(hex::encode(bytes))
}

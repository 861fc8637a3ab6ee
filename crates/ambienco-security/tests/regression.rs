#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Regression tests for ambienco-security: Sanitizer, RateLimiter, AdminAuth.

use ambienco_security::{hash_password, AdminAuth, AdminCredentials, RateLimiter, Sanitizer};
use std::sync::Arc;

// --- Sanitizer ---

#[test]
fn test_sanitizer_keeps_arabic_and_emoji() {
    let s = Sanitizer::default();
    let input = "مرحبا, do you ship to Riyadh? 💡";
    assert_eq!(s.sanitize(input).into_result().unwrap(), input);
}

#[test]
fn test_sanitizer_limit_is_bytes() {
    // each Arabic letter is two bytes in UTF-8
    let s = Sanitizer::new(6);
    assert!(!s.sanitize("ضوء").is_rejected());
    assert!(s.sanitize("ضوءان").is_rejected());
}

// --- RateLimiter ---

#[tokio::test]
async fn test_rate_limiter_refills_over_time() {
    let limiter = RateLimiter::new(1.0, 20.0);
    assert!(limiter.check("client").await);
    assert!(!limiter.check("client").await);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(limiter.check("client").await);
}

#[tokio::test]
async fn test_rate_limiter_concurrent_clients() {
    let limiter = Arc::new(RateLimiter::new(3.0, 0.001));
    let mut handles = Vec::new();
    for _ in 0..10 {
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move { limiter.check("shared").await }));
    }
    let mut allowed = 0;
    for handle in handles {
        if handle.await.unwrap() {
            allowed += 1;
        }
    }
    assert_eq!(allowed, 3);
}

// --- AdminAuth ---

#[tokio::test]
async fn test_admin_auth_end_to_end() {
    let auth = AdminAuth::new(
        Some(AdminCredentials {
            username: "showroom".to_string(),
            password_sha256: hash_password("correct horse"),
        }),
        chrono::Duration::minutes(5),
    );
    assert!(auth.is_enabled());

    let token = auth.login("showroom", "correct horse").await.unwrap();
    assert!(token.expires_at > chrono::Utc::now());
    auth.validate(&token.token).await.unwrap();

    assert!(auth.validate("0".repeat(64).as_str()).await.is_err());
    assert_eq!(auth.purge_expired().await, 0);
    assert!(auth.revoke(&token.token).await);
    assert_eq!(auth.active_sessions().await, 0);
}

#[tokio::test]
async fn test_admin_auth_disabled_never_logs_in() {
    let auth = AdminAuth::new(None, chrono::Duration::minutes(5));
    let err = auth.login("", "").await.unwrap_err();
    assert!(err.to_string().starts_with("Unauthorized:"));
}

use crate::error::{ok, ok_message, ApiResult};
use crate::middleware::AdminSession;
use crate::records::LoginRequest;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

/// `POST /admin/login`: exchange credentials for a bearer token.
pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Json(body) = payload?;
    let token = state.auth.login(&body.username, &body.password).await?;
    ok(token)
}

/// `POST /admin/logout`: revoke the presented token.
pub(crate) async fn logout(
    admin: AdminSession,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    state.auth.revoke(&admin.token).await;
    Ok(ok_message("Logged out"))
}

use crate::error::{ok, ApiResult};
use crate::records::{ForumPost, NewForumPost, NewForumReply, FORUM_POST_PREFIX};
use crate::server::AppState;
use ambienco_core::AmbiencoError;
use ambienco_store::KvStoreExt;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

/// Apply `change` to a stored post in one atomic store update.
async fn update_post<F>(state: &AppState, id: &str, change: F) -> ApiResult<ForumPost>
where
    F: FnOnce(&mut ForumPost) + Send,
{
    let post = state
        .store
        .update_as(&ForumPost::key(id), |current: Option<ForumPost>| {
            let mut post =
                current.ok_or_else(|| AmbiencoError::NotFound("Post not found".to_string()))?;
            change(&mut post);
            Ok(post)
        })
        .await?;
    Ok(post)
}

pub(crate) async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut posts: Vec<ForumPost> = state.store.get_by_prefix_as(FORUM_POST_PREFIX).await?;
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ok(posts)
}

pub(crate) async fn create_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewForumPost>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(body) = payload?;
    let post = body.into_post(&state.sanitizer)?;
    state.store.set_as(&ForumPost::key(&post.id), &post).await?;
    info!(post_id = %post.id, category = %post.category, "Forum post created");
    Ok((StatusCode::CREATED, ok(post)?))
}

pub(crate) async fn add_reply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<NewForumReply>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(body) = payload?;
    let reply = body.into_reply(&state.sanitizer)?;
    let post = update_post(&state, &id, move |post| post.replies.push(reply)).await?;
    info!(post_id = %id, replies = post.replies.len(), "Forum reply added");
    Ok((StatusCode::CREATED, ok(post)?))
}

pub(crate) async fn like_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let post = update_post(&state, &id, |post| post.likes = post.likes.saturating_add(1)).await?;
    ok(serde_json::json!({"id": post.id, "likes": post.likes}))
}

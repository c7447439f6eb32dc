//! Comment endpoints, nested under a reel.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
};
use reels_common::AppResult;
use reels_core::{CreateCommentInput, UpdateCommentInput};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::reels::{CommentResponse, MessageResponse},
    extractors::AuthUser,
    middleware::AppState,
};

/// Create comment request.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(flatten)]
    pub input: CreateCommentInput,
}

/// Append a comment to a reel.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(reel_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state
        .comment_service
        .create(&user.id, &reel_id, req.input)
        .await?;

    // The comment author is the caller; no extra fetch needed.
    let authors = HashMap::from([(user.id.clone(), user)]);
    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::from_comment(&comment, &authors)),
    ))
}

/// Update comment request.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(flatten)]
    pub input: UpdateCommentInput,
}

/// Comment update confirmation.
#[derive(Serialize)]
pub struct CommentUpdatedResponse {
    pub message: String,
    pub comment: CommentResponse,
}

/// Edit a comment's text. Only the comment's author may edit it.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((reel_id, comment_id)): Path<(String, String)>,
    Json(req): Json<UpdateCommentRequest>,
) -> AppResult<Json<CommentUpdatedResponse>> {
    let comment = state
        .comment_service
        .update(&user.id, &reel_id, &comment_id, req.input)
        .await?;

    let authors = HashMap::from([(user.id.clone(), user)]);
    Ok(Json(CommentUpdatedResponse {
        message: "Comment updated successfully".to_string(),
        comment: CommentResponse::from_comment(&comment, &authors),
    }))
}

/// Remove a comment. Only the comment's author may delete it.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((reel_id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    state
        .comment_service
        .delete(&user.id, &reel_id, &comment_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Comment deleted successfully".to_string(),
    }))
}

/// Comment like-toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentLikeResponse {
    pub message: String,
    /// Whether the caller likes the comment after the toggle.
    pub liked: bool,
    /// Like count after the toggle.
    pub likes: usize,
    pub comment_id: String,
}

/// Toggle the caller's like on a comment.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((reel_id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<CommentLikeResponse>> {
    let outcome = state
        .comment_service
        .toggle_like(&user.id, &reel_id, &comment_id)
        .await?;

    Ok(Json(CommentLikeResponse {
        message: if outcome.liked {
            "Comment liked".to_string()
        } else {
            "Comment unliked".to_string()
        },
        liked: outcome.liked,
        likes: outcome.likes,
        comment_id: outcome.comment_id,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{reel_id}/comments", post(create))
        .route("/{reel_id}/comments/{comment_id}", put(update).delete(remove))
        .route("/{reel_id}/comments/{comment_id}/like", post(toggle_like))
}

//! Reel endpoints.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use reels_common::AppResult;
use reels_core::{CreateReelInput, UpdateReelInput};
use reels_db::entities::{reel, user};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState};

/// Public profile projection of a user, embedded where responses expand
/// an author reference.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<&user::Model> for AuthorInfo {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Comment response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub text: String,
    /// `None` when the author's account no longer exists.
    pub author: Option<AuthorInfo>,
    pub likes: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl CommentResponse {
    pub(super) fn from_comment(
        comment: &reel::Comment,
        authors: &HashMap<String, user::Model>,
    ) -> Self {
        Self {
            id: comment.id.clone(),
            text: comment.text.clone(),
            author: authors.get(&comment.author_id).map(AuthorInfo::from),
            likes: comment.likes.clone(),
            created_at: comment.created_at.to_rfc3339(),
            updated_at: comment.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Reel response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReelResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub text: String,
    /// `None` when the author's account no longer exists.
    pub author: Option<AuthorInfo>,
    pub likes: Vec<String>,
    pub comments: Vec<CommentResponse>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl ReelResponse {
    pub(super) fn from_model(reel: &reel::Model, authors: &HashMap<String, user::Model>) -> Self {
        Self {
            id: reel.id.clone(),
            title: reel.title.clone(),
            description: reel.description.clone(),
            text: reel.text.clone(),
            author: authors.get(&reel.author_id).map(AuthorInfo::from),
            likes: reel.like_list(),
            comments: reel
                .comment_list()
                .iter()
                .map(|c| CommentResponse::from_comment(c, authors))
                .collect(),
            created_at: reel.created_at.to_rfc3339(),
            updated_at: reel.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Confirmation response.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create reel request.
#[derive(Debug, Deserialize)]
pub struct CreateReelRequest {
    #[serde(flatten)]
    pub input: CreateReelInput,
}

/// Create a new reel authored by the caller.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReelRequest>,
) -> AppResult<(StatusCode, Json<ReelResponse>)> {
    let reel = state.reel_service.create(&user.id, req.input).await?;

    // The author is the caller; no extra fetch needed.
    let authors = HashMap::from([(user.id.clone(), user)]);
    Ok((
        StatusCode::CREATED,
        Json(ReelResponse::from_model(&reel, &authors)),
    ))
}

/// Get all reels, newest first.
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ReelResponse>>> {
    let listing = state.reel_service.list().await?;
    Ok(Json(
        listing
            .reels
            .iter()
            .map(|r| ReelResponse::from_model(r, &listing.authors))
            .collect(),
    ))
}

/// Get the top reels by engagement.
async fn trending(State(state): State<AppState>) -> AppResult<Json<Vec<ReelResponse>>> {
    let listing = state.reel_service.trending().await?;
    Ok(Json(
        listing
            .reels
            .iter()
            .map(|r| ReelResponse::from_model(r, &listing.authors))
            .collect(),
    ))
}

/// Get one reel by ID.
async fn show(
    State(state): State<AppState>,
    Path(reel_id): Path<String>,
) -> AppResult<Json<ReelResponse>> {
    let (reel, authors) = state.reel_service.get(&reel_id).await?;
    Ok(Json(ReelResponse::from_model(&reel, &authors)))
}

/// Update reel request.
#[derive(Debug, Deserialize)]
pub struct UpdateReelRequest {
    #[serde(flatten)]
    pub input: UpdateReelInput,
}

/// Update a reel. Only its author may update it.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(reel_id): Path<String>,
    Json(req): Json<UpdateReelRequest>,
) -> AppResult<Json<ReelResponse>> {
    let reel = state.reel_service.update(&user.id, &reel_id, req.input).await?;

    // Ownership was just enforced: the author is the caller.
    let authors = HashMap::from([(user.id.clone(), user)]);
    Ok(Json(ReelResponse::from_model(&reel, &authors)))
}

/// Delete a reel. Only its author may delete it.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(reel_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.reel_service.delete(&user.id, &reel_id).await?;
    Ok(Json(MessageResponse {
        message: "Reel deleted successfully".to_string(),
    }))
}

/// Toggle the caller's like on a reel.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(reel_id): Path<String>,
) -> AppResult<Json<ReelResponse>> {
    let (reel, authors) = state.reel_service.toggle_like(&user.id, &reel_id).await?;
    Ok(Json(ReelResponse::from_model(&reel, &authors)))
}

/// Bulk-delete response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Delete every reel. Restricted to the configured administrator.
async fn purge_all(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<PurgeResponse>> {
    let deleted = state.reel_service.purge_all(&user).await?;
    Ok(Json(PurgeResponse {
        message: "All reels deleted successfully".to_string(),
        deleted_count: deleted,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/trending", get(trending))
        .route("/admin/delete-all", delete(purge_all))
        .route("/{reel_id}", get(show).put(update).delete(remove))
        .route("/{reel_id}/like", post(toggle_like))
}

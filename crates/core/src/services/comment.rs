//! Comment service.
//!
//! Comments live inside their parent reel's embedded `comments` array,
//! so every mutation here is a read-modify-write of the whole reel row.
//! There is no optimistic-concurrency guard: two concurrent mutations of
//! the same reel (toggle vs. toggle, append vs. delete) can lose one of
//! the updates, last writer wins. That matches the store's contract;
//! callers get no partial-success states either way.

use reels_common::{AppError, AppResult, IdGenerator};
use reels_db::{
    entities::reel::{self, Comment},
    repositories::ReelRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::services::reel::toggle_membership;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    reel_repo: ReelRepository,
    id_gen: IdGenerator,
}

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 2048))]
    pub text: String,
}

/// Input for editing a comment. Only the text may change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(length(min = 1, max = 2048))]
    pub text: String,
}

/// Result of a comment like toggle.
pub struct CommentLikeOutcome {
    pub comment_id: String,
    /// Whether the caller likes the comment after the toggle.
    pub liked: bool,
    /// Like count after the toggle.
    pub likes: usize,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(reel_repo: ReelRepository) -> Self {
        Self {
            reel_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append a comment to a reel.
    pub async fn create(
        &self,
        caller_id: &str,
        reel_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<Comment> {
        input.validate()?;

        let reel = self.reel_repo.get_by_id(reel_id).await?;

        let comment = Comment {
            id: self.id_gen.generate(),
            text: input.text,
            author_id: caller_id.to_string(),
            likes: vec![],
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        let mut comments = reel.comment_list();
        comments.push(comment.clone());
        self.persist_comments(reel, comments).await?;

        tracing::debug!(reel_id = %reel_id, comment_id = %comment.id, "Created comment");
        Ok(comment)
    }

    /// Replace a comment's text. Only the comment's author may edit it,
    /// independent of who owns the parent reel.
    pub async fn update(
        &self,
        caller_id: &str,
        reel_id: &str,
        comment_id: &str,
        input: UpdateCommentInput,
    ) -> AppResult<Comment> {
        input.validate()?;

        let reel = self.reel_repo.get_by_id(reel_id).await?;
        let mut comments = reel.comment_list();

        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| AppError::CommentNotFound(comment_id.to_string()))?;

        if comment.author_id != caller_id {
            return Err(AppError::Forbidden(
                "You're not allowed to update this comment".to_string(),
            ));
        }

        comment.text = input.text;
        comment.updated_at = Some(chrono::Utc::now());
        let updated = comment.clone();

        self.persist_comments(reel, comments).await?;
        Ok(updated)
    }

    /// Remove a comment. Only the comment's author may delete it.
    pub async fn delete(
        &self,
        caller_id: &str,
        reel_id: &str,
        comment_id: &str,
    ) -> AppResult<()> {
        let reel = self.reel_repo.get_by_id(reel_id).await?;
        let mut comments = reel.comment_list();

        let pos = comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| AppError::CommentNotFound(comment_id.to_string()))?;

        if comments[pos].author_id != caller_id {
            return Err(AppError::Forbidden(
                "You're not allowed to delete this comment".to_string(),
            ));
        }

        comments.remove(pos);
        self.persist_comments(reel, comments).await?;

        tracing::debug!(reel_id = %reel_id, comment_id = %comment_id, "Deleted comment");
        Ok(())
    }

    /// Toggle the caller's like on a comment. No ownership restriction.
    pub async fn toggle_like(
        &self,
        caller_id: &str,
        reel_id: &str,
        comment_id: &str,
    ) -> AppResult<CommentLikeOutcome> {
        let reel = self.reel_repo.get_by_id(reel_id).await?;
        let mut comments = reel.comment_list();

        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| AppError::CommentNotFound(comment_id.to_string()))?;

        let liked = toggle_membership(&mut comment.likes, caller_id);
        let outcome = CommentLikeOutcome {
            comment_id: comment.id.clone(),
            liked,
            likes: comment.likes.len(),
        };

        self.persist_comments(reel, comments).await?;
        Ok(outcome)
    }

    /// Write the embedded comments array back as part of a whole-row
    /// rewrite of the parent reel.
    async fn persist_comments(
        &self,
        reel: reel::Model,
        comments: Vec<Comment>,
    ) -> AppResult<reel::Model> {
        let mut active: reel::ActiveModel = reel.into();
        active.comments = Set(json!(comments));
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        self.reel_repo.update(active).await
    }
}

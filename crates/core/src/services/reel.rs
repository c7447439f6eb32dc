//! Reel service.

use std::collections::HashMap;

use reels_common::{AppError, AppResult, IdGenerator, is_valid_id};
use reels_db::{
    entities::{reel, user},
    repositories::{ReelRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::services::authorization::AdminPolicy;

/// Number of reels returned by the trending feed.
const TRENDING_LIMIT: usize = 10;

/// Reel service for business logic.
#[derive(Clone)]
pub struct ReelService {
    reel_repo: ReelRepository,
    user_repo: UserRepository,
    admin_policy: AdminPolicy,
    id_gen: IdGenerator,
}

/// Input for creating a new reel.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReelInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 2048))]
    pub description: String,

    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

/// Input for updating a reel. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReelInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2048))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub text: Option<String>,
}

/// Reels together with the user records needed to expand author
/// references in responses.
pub struct ReelListing {
    pub reels: Vec<reel::Model>,
    pub authors: HashMap<String, user::Model>,
}

impl ReelService {
    /// Create a new reel service.
    #[must_use]
    pub fn new(
        reel_repo: ReelRepository,
        user_repo: UserRepository,
        admin_policy: AdminPolicy,
    ) -> Self {
        Self {
            reel_repo,
            user_repo,
            admin_policy,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new reel authored by `author_id`.
    pub async fn create(&self, author_id: &str, input: CreateReelInput) -> AppResult<reel::Model> {
        input.validate()?;

        let model = reel::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            text: Set(input.text),
            likes: Set(json!([])),
            comments: Set(json!([])),
            ..Default::default()
        };

        self.reel_repo.create(model).await
    }

    /// Get all reels, newest first, with authors for expansion.
    pub async fn list(&self) -> AppResult<ReelListing> {
        let reels = self.reel_repo.find_all().await?;
        let authors = self.load_authors(&reels).await?;
        Ok(ReelListing { reels, authors })
    }

    /// Get one reel by ID with its authors for expansion.
    pub async fn get(&self, reel_id: &str) -> AppResult<(reel::Model, HashMap<String, user::Model>)> {
        let reel = self.reel_repo.get_by_id(reel_id).await?;
        let authors = self.load_authors(std::slice::from_ref(&reel)).await?;
        Ok((reel, authors))
    }

    /// The trending feed: top reels by engagement.
    ///
    /// Score is like count plus comment count, with missing or
    /// malformed arrays counting as zero. Ties keep store order.
    pub async fn trending(&self) -> AppResult<ReelListing> {
        let all = self.reel_repo.find_all().await?;
        let reels = rank_by_engagement(all);
        tracing::debug!(count = reels.len(), "Computed trending reels");
        let authors = self.load_authors(&reels).await?;
        Ok(ReelListing { reels, authors })
    }

    /// Update a reel. Only its author may update it.
    pub async fn update(
        &self,
        caller_id: &str,
        reel_id: &str,
        input: UpdateReelInput,
    ) -> AppResult<reel::Model> {
        input.validate()?;

        let reel = self.reel_repo.get_by_id(reel_id).await?;
        if reel.author_id != caller_id {
            return Err(AppError::Forbidden(
                "You're not allowed to update this reel".to_string(),
            ));
        }

        let mut active: reel::ActiveModel = reel.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(text) = input.text {
            active.text = Set(text);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.reel_repo.update(active).await
    }

    /// Delete a reel. Only its author may delete it.
    pub async fn delete(&self, caller_id: &str, reel_id: &str) -> AppResult<()> {
        // Reject malformed IDs before touching the store.
        if !is_valid_id(reel_id) {
            return Err(AppError::InvalidArgument(
                "Invalid reel ID format".to_string(),
            ));
        }

        let reel = self.reel_repo.get_by_id(reel_id).await?;
        if reel.author_id != caller_id {
            return Err(AppError::Forbidden(
                "You're not allowed to delete this reel".to_string(),
            ));
        }

        let affected = self.reel_repo.delete(reel_id).await?;
        if affected == 0 {
            // Existence was just confirmed; a concurrent delete won.
            return Err(AppError::Internal("Failed to delete reel".to_string()));
        }

        tracing::debug!(reel_id = %reel_id, "Deleted reel");
        Ok(())
    }

    /// Toggle the caller's like on a reel. Any authenticated user may
    /// like any reel, including their own.
    ///
    /// The likes array is rewritten with the whole row; two concurrent
    /// toggles on the same reel can lose one of the updates (last
    /// writer wins).
    pub async fn toggle_like(
        &self,
        caller_id: &str,
        reel_id: &str,
    ) -> AppResult<(reel::Model, HashMap<String, user::Model>)> {
        let reel = self.reel_repo.get_by_id(reel_id).await?;

        let mut likes = reel.like_list();
        let liked = toggle_membership(&mut likes, caller_id);
        tracing::debug!(reel_id = %reel_id, liked = liked, "Toggled reel like");

        let mut active: reel::ActiveModel = reel.into();
        active.likes = Set(json!(likes));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.reel_repo.update(active).await?;
        let authors = self.load_authors(std::slice::from_ref(&updated)).await?;
        Ok((updated, authors))
    }

    /// Delete every reel. Restricted to the configured administrator.
    pub async fn purge_all(&self, caller: &user::Model) -> AppResult<u64> {
        if !self.admin_policy.can_purge_reels(caller) {
            return Err(AppError::Forbidden(
                "You're not authorized to perform this action".to_string(),
            ));
        }

        let deleted = self.reel_repo.delete_all().await?;
        tracing::info!(deleted = deleted, admin = %caller.username, "Purged all reels");
        Ok(deleted)
    }

    /// Fetch the user records referenced by `reels` (reel authors and
    /// comment authors) keyed by ID.
    async fn load_authors(
        &self,
        reels: &[reel::Model],
    ) -> AppResult<HashMap<String, user::Model>> {
        let mut ids: Vec<String> = reels.iter().map(|r| r.author_id.clone()).collect();
        ids.extend(
            reels
                .iter()
                .flat_map(|r| r.comment_list().into_iter().map(|c| c.author_id)),
        );
        ids.sort_unstable();
        ids.dedup();

        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }
}

/// Toggle `user_id` membership in a likes set. Returns whether the ID
/// is present afterwards.
pub(crate) fn toggle_membership(likes: &mut Vec<String>, user_id: &str) -> bool {
    if let Some(pos) = likes.iter().position(|id| id == user_id) {
        likes.remove(pos);
        false
    } else {
        likes.push(user_id.to_string());
        true
    }
}

/// Sort reels by descending engagement and keep the top of the feed.
///
/// The sort is stable: equally-scored reels keep the order the store
/// returned them in.
fn rank_by_engagement(mut reels: Vec<reel::Model>) -> Vec<reel::Model> {
    reels.sort_by_key(|r| std::cmp::Reverse(r.engagement()));
    reels.truncate(TRENDING_LIMIT);
    reels
}

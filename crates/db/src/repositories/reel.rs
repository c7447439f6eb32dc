//! Reel repository.

use std::sync::Arc;

use crate::entities::{Reel, reel};
use reels_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder,
};

/// Reel repository for database operations.
#[derive(Clone)]
pub struct ReelRepository {
    db: Arc<DatabaseConnection>,
}

impl ReelRepository {
    /// Create a new reel repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a reel by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<reel::Model>> {
        Reel::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a reel by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<reel::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReelNotFound(id.to_string()))
    }

    /// Get all reels, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<reel::Model>> {
        Reel::find()
            .order_by_desc(reel::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new reel.
    pub async fn create(&self, model: reel::ActiveModel) -> AppResult<reel::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a reel (whole-row rewrite).
    pub async fn update(&self, model: reel::ActiveModel) -> AppResult<reel::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a reel, returning the number of rows affected.
    ///
    /// Callers that checked existence first treat zero affected rows as
    /// a lost race with a concurrent delete.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Reel::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Delete every reel, returning the number deleted.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = Reel::delete_many()
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

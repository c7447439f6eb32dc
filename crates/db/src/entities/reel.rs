//! Reel entity.
//!
//! A reel row carries its likes and comments as embedded JSON documents,
//! so a reel and everything hanging off it lives in a single row. Both
//! arrays are rewritten wholesale whenever they are mutated.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reel")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author user ID
    #[sea_orm(indexed)]
    pub author_id: String,

    pub title: String,

    pub description: String,

    /// Reel text content
    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// User IDs that liked this reel (set semantics)
    #[sea_orm(column_type = "JsonBinary")]
    pub likes: Json,

    /// Embedded comments, insertion order = display order
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

/// A comment embedded in a reel's `comments` array.
///
/// Comments are not independently addressable; their `id` is unique
/// within the parent reel only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author_id: String,
    /// User IDs that liked this comment (set semantics)
    #[serde(default)]
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Decode the likes array, treating a missing or non-array value as
    /// empty.
    #[must_use]
    pub fn like_list(&self) -> Vec<String> {
        self.likes.as_array().map_or_else(Vec::new, |arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
    }

    /// Decode the embedded comments, treating a missing or non-array
    /// value as empty.
    #[must_use]
    pub fn comment_list(&self) -> Vec<Comment> {
        serde_json::from_value(self.comments.clone()).unwrap_or_default()
    }

    /// Engagement score: like count plus comment count.
    #[must_use]
    pub fn engagement(&self) -> usize {
        let likes = self.likes.as_array().map_or(0, Vec::len);
        let comments = self.comments.as_array().map_or(0, Vec::len);
        likes + comments
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reel_with(likes: Json, comments: Json) -> Model {
        Model {
            id: "01hx0000000000000000000000".to_string(),
            author_id: "01hx0000000000000000000001".to_string(),
            title: "title".to_string(),
            description: "description".to_string(),
            text: "text".to_string(),
            likes,
            comments,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn like_list_decodes_user_ids() {
        let reel = reel_with(json!(["u1", "u2"]), json!([]));
        assert_eq!(reel.like_list(), vec!["u1", "u2"]);
    }

    #[test]
    fn missing_or_malformed_arrays_decode_as_empty() {
        let reel = reel_with(json!(null), json!("not an array"));
        assert!(reel.like_list().is_empty());
        assert!(reel.comment_list().is_empty());
        assert_eq!(reel.engagement(), 0);
    }

    #[test]
    fn comments_roundtrip_through_json() {
        let comment = Comment {
            id: "c1".to_string(),
            text: "nice reel".to_string(),
            author_id: "u1".to_string(),
            likes: vec!["u2".to_string()],
            created_at: Utc::now(),
            updated_at: None,
        };
        let reel = reel_with(json!([]), json!([comment.clone()]));

        assert_eq!(reel.comment_list(), vec![comment]);
        assert_eq!(reel.engagement(), 1);
    }

    #[test]
    fn engagement_counts_likes_and_comments() {
        let reel = reel_with(json!(["u1", "u2", "u3"]), json!([{"bogus": true}, {}]));
        // Counting does not require the elements to decode as comments.
        assert_eq!(reel.engagement(), 5);
    }
}

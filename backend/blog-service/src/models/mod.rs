/// Domain records for blog-service
///
/// Post, Group, Comment and Follow use store-assigned sequential ids so that
/// the listing tie-break (newest first, higher id first) reflects insertion
/// order. User ids are UUIDs assigned by the upstream identity provider.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
    /// Opaque reference into external image storage
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    /// Cleared (not cascaded) when the annotated post is deleted
    pub post_id: Option<i64>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
}

impl Comment {
    /// Short display summary: the first 15 characters of the comment's own
    /// text, truncated on a char boundary.
    pub fn summary(&self) -> &str {
        match self.text.char_indices().nth(15) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub follower_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment_with_text(text: &str) -> Comment {
        Comment {
            id: 1,
            post_id: Some(1),
            text: text.to_string(),
            created_at: Utc::now(),
            author_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn summary_truncates_long_text() {
        let comment = comment_with_text("this comment is much longer than fifteen characters");
        assert_eq!(comment.summary(), "this comment is");
    }

    #[test]
    fn summary_keeps_short_text_whole() {
        let comment = comment_with_text("short");
        assert_eq!(comment.summary(), "short");
    }

    #[test]
    fn summary_respects_char_boundaries() {
        let comment = comment_with_text("посты и комментарии");
        assert_eq!(comment.summary(), "посты и коммент");
    }
}

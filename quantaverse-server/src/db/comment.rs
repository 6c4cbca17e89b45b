//! Comment entity and repository

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// Comment entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub author_username: String,
    pub content: String,
}

/// Comment response DTO for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentRecord {
    /// Unique comment identifier
    #[schema(value_type = String)]
    pub id: Uuid,
    /// The post this comment belongs to
    #[schema(value_type = String)]
    pub post_id: Uuid,
    /// Author's user id
    #[schema(value_type = String)]
    pub user_id: Uuid,
    /// Author's username at commenting time
    #[schema(example = "bob")]
    pub author_username: String,
    /// Comment content
    #[schema(example = "Great point about key sizes")]
    pub content: String,
    /// When the comment was created
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentRecord {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            author_username: comment.author_username,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// Repository for comment database operations
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new comment
    pub async fn create(&self, input: CreateComment) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, author_username, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(input.post_id)
        .bind(input.user_id)
        .bind(&input.author_username)
        .bind(&input.content)
        .fetch_one(&self.pool)
        .await
    }

    /// List comments for a post, newest first
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT * FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Count comments authored by a user (for activity stats)
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_record_from_comment() {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            author_username: "bob".to_string(),
            content: "nice".to_string(),
            created_at: Utc::now(),
        };

        let record = CommentRecord::from(comment.clone());
        assert_eq!(record.id, comment.id);
        assert_eq!(record.post_id, comment.post_id);
        assert_eq!(record.author_username, "bob");
    }
}

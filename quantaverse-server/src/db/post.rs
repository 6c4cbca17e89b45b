//! Post entity and repository
//!
//! Posts are text-only, with denormalized author usernames and engagement
//! counters maintained in-row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// Post entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub user_id: Uuid,
    pub author_username: String,
    pub content: String,
}

/// DTO for editing a post
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePost {
    /// New post content
    #[schema(example = "Updated thoughts on lattice cryptography")]
    pub content: String,
}

/// Post response DTO for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostRecord {
    /// Unique post identifier
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    /// Author's user id
    #[schema(value_type = String)]
    pub user_id: Uuid,

    /// Author's username at posting time
    #[schema(example = "alice")]
    pub author_username: String,

    /// Post content
    #[schema(example = "Hello, quantum world")]
    pub content: String,

    /// Engagement counters
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub view_count: i64,

    /// When the post was created
    #[schema(value_type = String, example = "2026-01-08T10:00:00Z")]
    pub created_at: DateTime<Utc>,

    /// When the post was last edited
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostRecord {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            author_username: post.author_username,
            content: post.content,
            like_count: post.like_count,
            comment_count: post.comment_count,
            share_count: post.share_count,
            view_count: post.view_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Pagination parameters for the feed
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PostListParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Items per page (max 100)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl Default for PostListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Paginated post list response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostListResponse {
    pub posts: Vec<PostRecord>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub has_more: bool,
}

/// Repository for post database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new post
    pub async fn create(&self, input: CreatePost) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, author_username, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(input.user_id)
        .bind(&input.author_username)
        .bind(&input.content)
        .fetch_one(&self.pool)
        .await
    }

    /// Find post by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Fetch a post and bump its view counter in one round trip.
    pub async fn find_and_record_view(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List the feed, newest first, with pagination.
    pub async fn list(&self, params: &PostListParams) -> Result<PostListResponse, sqlx::Error> {
        let limit = params.limit.clamp(1, 100);
        let offset = (params.page - 1).max(0) * limit;

        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        let records: Vec<PostRecord> = posts.into_iter().map(PostRecord::from).collect();
        let has_more = offset + (records.len() as i64) < total.0;

        Ok(PostListResponse {
            posts: records,
            page: params.page.max(1),
            limit,
            total: total.0,
            has_more,
        })
    }

    /// Update a post's content
    pub async fn update_content(&self, id: Uuid, content: &str) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a post. Comments go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Increment the like counter
    pub async fn record_like(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE posts SET like_count = like_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Increment the share counter
    pub async fn record_share(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE posts SET share_count = share_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Increment the comment counter
    pub async fn record_comment(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Count posts authored by a user (for activity stats)
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE user_id = $1")
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
    fn test_post_record_from_post() {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            author_username: "alice".to_string(),
            content: "hello".to_string(),
            like_count: 3,
            comment_count: 1,
            share_count: 0,
            view_count: 12,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let record = PostRecord::from(post.clone());
        assert_eq!(record.id, post.id);
        assert_eq!(record.author_username, "alice");
        assert_eq!(record.like_count, 3);
        assert_eq!(record.view_count, 12);
    }

    #[test]
    fn test_list_params_defaults() {
        let params: PostListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
    }
}

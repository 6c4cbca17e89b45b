//! Comment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::{CommentRecord, CreateComment};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_comment_content;

/// Request to add a comment
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    /// Comment content (non-empty, max 500 characters)
    #[schema(example = "Strong agree on the key sizes")]
    pub content: String,
}

/// Response carrying a single comment
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub comment: CommentRecord,
}

/// Response carrying a post's comments
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<CommentRecord>,
}

/// POST /api/posts/{id}/comments
///
/// Add a comment to a post and bump the post's comment counter.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    tag = "Comments",
    params(("id" = String, Path, description = "Post id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Empty or oversized content"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    validate_comment_content(&req.content)?;

    let post_repo = state
        .post_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;
    let comment_repo = state
        .comment_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    post_repo
        .find_by_id(post_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let comment = comment_repo
        .create(CreateComment {
            post_id,
            user_id: auth.user.id,
            author_username: auth.user.username.clone(),
            content: req.content.trim().to_string(),
        })
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create comment: {e}")))?;

    post_repo
        .record_comment(post_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to update comment count: {e}")))?;

    tracing::info!(
        comment_id = %comment.id,
        post_id = %post_id,
        user_id = %auth.user.id,
        "Comment created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            comment: CommentRecord::from(comment),
        }),
    ))
}

/// GET /api/posts/{id}/comments
///
/// List a post's comments, newest first.
#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    tag = "Comments",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "The post's comments", body = CommentListResponse),
        (status = 404, description = "Post not found"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<CommentListResponse>, ApiError> {
    let post_repo = state
        .post_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;
    let comment_repo = state
        .comment_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    post_repo
        .find_by_id(post_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let comments = comment_repo
        .list_for_post(post_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list comments: {e}")))?;

    Ok(Json(CommentListResponse {
        comments: comments.into_iter().map(CommentRecord::from).collect(),
    }))
}

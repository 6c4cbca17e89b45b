//! Post handlers
//!
//! CRUD plus engagement counters for the public feed. Reads are public;
//! writes require a session, and edits/deletes are owner-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::{CreatePost, PostListParams, PostListResponse, PostRecord, PostRepository, UpdatePost};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_post_content;

/// Request to create a post
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    /// Post content (non-empty, max 2000 characters)
    #[schema(example = "Lattice problems make fine login credentials")]
    pub content: String,
}

/// Response carrying a single post
#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub post: PostRecord,
}

/// Acknowledgment for counter endpoints and deletes
#[derive(Debug, Serialize, ToSchema)]
pub struct PostActionResponse {
    pub success: bool,
    pub message: String,
}

fn post_repo(state: &AppState) -> Result<&PostRepository, ApiError> {
    state
        .post_repo
        .as_deref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))
}

/// POST /api/posts
///
/// Create a post authored by the session user.
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Empty or oversized content"),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    validate_post_content(&req.content)?;

    let post = post_repo(&state)?
        .create(CreatePost {
            user_id: auth.user.id,
            author_username: auth.user.username.clone(),
            content: req.content.trim().to_string(),
        })
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create post: {e}")))?;

    tracing::info!(post_id = %post.id, user_id = %auth.user.id, "Post created");

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            post: PostRecord::from(post),
        }),
    ))
}

/// GET /api/posts
///
/// The public feed, newest first, paginated.
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Items per page (max 100)")
    ),
    responses(
        (status = 200, description = "Paginated feed", body = PostListResponse),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> Result<Json<PostListResponse>, ApiError> {
    let response = post_repo(&state)?
        .list(&params)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to list posts: {e}")))?;

    Ok(Json(response))
}

/// GET /api/posts/{id}
///
/// Fetch a single post; each fetch counts as a view.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "Post not found"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = post_repo(&state)?
        .find_and_record_view(id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(PostResponse {
        post: PostRecord::from(post),
    }))
}

/// PUT /api/posts/{id}
///
/// Edit a post. Only the author may edit.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = String, Path, description = "Post id")),
    request_body = UpdatePost,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Empty or oversized content"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePost>,
) -> Result<Json<PostResponse>, ApiError> {
    validate_post_content(&req.content)?;

    let repo = post_repo(&state)?;

    let post = repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.user_id != auth.user.id {
        return Err(ApiError::forbidden("Not authorized to edit this post"));
    }

    let updated = repo
        .update_content(id, req.content.trim())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to update post: {e}")))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(PostResponse {
        post: PostRecord::from(updated),
    }))
}

/// DELETE /api/posts/{id}
///
/// Delete a post and its comments. Only the author may delete.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted", body = PostActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostActionResponse>, ApiError> {
    let repo = post_repo(&state)?;

    let post = repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.user_id != auth.user.id {
        return Err(ApiError::forbidden("Not authorized to delete this post"));
    }

    repo.delete(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to delete post: {e}")))?;

    tracing::info!(post_id = %id, user_id = %auth.user.id, "Post deleted");

    Ok(Json(PostActionResponse {
        success: true,
        message: "Post deleted successfully".to_string(),
    }))
}

/// POST /api/posts/{id}/like
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "Posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Like recorded", body = PostActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn like_post(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostActionResponse>, ApiError> {
    let liked = post_repo(&state)?
        .record_like(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to like post: {e}")))?;

    if !liked {
        return Err(ApiError::not_found("Post not found"));
    }

    Ok(Json(PostActionResponse {
        success: true,
        message: "Post liked".to_string(),
    }))
}

/// POST /api/posts/{id}/share
#[utoipa::path(
    post,
    path = "/api/posts/{id}/share",
    tag = "Posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Share recorded", body = PostActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn share_post(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostActionResponse>, ApiError> {
    let shared = post_repo(&state)?
        .record_share(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to share post: {e}")))?;

    if !shared {
        return Err(ApiError::not_found("Post not found"));
    }

    Ok(Json(PostActionResponse {
        success: true,
        message: "Post shared".to_string(),
    }))
}

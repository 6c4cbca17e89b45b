//! User profile handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::{PublicUser, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::validate_email;

/// Response for the current user's profile
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

/// Request to update the current user's profile
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    /// New email address
    #[schema(example = "alice@new-domain.com")]
    pub email: String,
}

/// Response for account deactivation
#[derive(Debug, Serialize, ToSchema)]
pub struct DeactivateResponse {
    pub success: bool,
    pub message: String,
}

/// Activity counters for the current user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserStatsResponse {
    pub total_posts: i64,
    pub total_comments: i64,
}

/// Public view of another user
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicUserResponse {
    pub user: PublicUser,
}

/// GET /api/users/me
///
/// Returns the authenticated user's full profile, public keys included.
/// Private key material never reaches the server, so there is nothing to
/// filter on that front.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn get_profile(auth: AuthenticatedUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user: UserResponse::from(auth.user),
    })
}

/// PUT /api/users/me
///
/// Update the authenticated user's email address.
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid email"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already registered"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    validate_email(&req.email)?;

    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = user_repo
        .update_email(auth.user.id, &req.email)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::conflict("Email already registered")
            }
            _ => ApiError::internal(format!("Failed to update profile: {e}")),
        })?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ProfileResponse {
        user: UserResponse::from(user),
    }))
}

/// DELETE /api/users/me
///
/// Deactivate the authenticated user's account. Posts and comments keep
/// their attribution; the account can no longer obtain login challenges.
#[utoipa::path(
    delete,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Account deactivated", body = DeactivateResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn deactivate_account(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<DeactivateResponse>, ApiError> {
    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let deactivated = user_repo
        .deactivate(auth.user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to deactivate account: {e}")))?;

    if deactivated {
        tracing::info!(user_id = %auth.user.id, "Account deactivated");
        Ok(Json(DeactivateResponse {
            success: true,
            message: "Account deactivated. Existing posts and comments are preserved.".to_string(),
        }))
    } else {
        Err(ApiError::internal("Failed to deactivate account"))
    }
}

/// GET /api/users/me/stats
///
/// Activity counters for the authenticated user.
#[utoipa::path(
    get,
    path = "/api/users/me/stats",
    tag = "Users",
    responses(
        (status = 200, description = "Activity counters", body = UserStatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_token" = []))
)]
pub async fn get_user_stats(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let post_repo = state
        .post_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;
    let comment_repo = state
        .comment_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let (total_posts, total_comments) = tokio::join!(
        post_repo.count_for_user(auth.user.id),
        comment_repo.count_for_user(auth.user.id),
    );

    Ok(Json(UserStatsResponse {
        total_posts: total_posts.map_err(|e| ApiError::internal(format!("Database error: {e}")))?,
        total_comments: total_comments
            .map_err(|e| ApiError::internal(format!("Database error: {e}")))?,
    }))
}

/// GET /api/users/{id}
///
/// Public view of a user: no email, no key material.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Public user view", body = PublicUserResponse),
        (status = 404, description = "User not found"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUserResponse>, ApiError> {
    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = user_repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(PublicUserResponse {
        user: PublicUser::from(user),
    }))
}

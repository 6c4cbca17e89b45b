//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

pub use auth::{
    check_availability, login_challenge, logout, refresh_token, register, verify_challenge,
    AvailabilityRequest, AvailabilityResponse, LoginChallengeRequest, LoginChallengeResponse,
    LogoutResponse, RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse,
    SessionResponse, VerifyChallengeRequest,
};
pub use comments::{
    add_comment, list_comments, CommentListResponse, CommentResponse, CreateCommentRequest,
};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use posts::{
    create_post, delete_post, get_post, like_post, list_posts, share_post, update_post,
    CreatePostRequest, PostActionResponse, PostResponse,
};
pub use users::{
    deactivate_account, get_profile, get_user, get_user_stats, update_profile, DeactivateResponse,
    ProfileResponse, PublicUserResponse, UpdateProfileRequest, UserStatsResponse,
};

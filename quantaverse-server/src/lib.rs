//! QuantaVerse Server Library - REST API components for post-quantum social networking
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod validation;

pub use auth::{AuthenticatedUser, ChallengeStore, JwtKeys, SessionClaims};
pub use config::Config;
pub use db::{
    Comment, CommentRecord, CommentRepository, CreateComment, CreatePost, CreateUser, Post,
    PostListParams, PostListResponse, PostRecord, PostRepository, PublicUser, UpdatePost, User,
    UserRepository, UserResponse,
};
pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::{create_router, create_router_with_config};
pub use state::AppState;

//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use quantaverse_core::PqcProvider;

use crate::auth::{ChallengeStore, JwtKeys};
use crate::db::{CommentRepository, PostRepository, UserRepository};

/// Application state containing shared resources.
///
/// Repository handles are optional so the server can come up without a
/// database (data endpoints answer 503), matching how it is deployed in
/// development and how the integration tests drive it.
#[derive(Clone)]
pub struct AppState {
    /// User repository
    pub user_repo: Option<Arc<UserRepository>>,
    /// Post repository
    pub post_repo: Option<Arc<PostRepository>>,
    /// Comment repository
    pub comment_repo: Option<Arc<CommentRepository>>,
    /// In-memory store for pending login challenges
    pub challenges: Arc<ChallengeStore>,
    /// PQC provider (bridge in production, mock in tests)
    pub pqc: Arc<dyn PqcProvider>,
    /// JWT signing/verification keys
    pub jwt: Arc<JwtKeys>,
    /// Login challenge lifetime in seconds
    pub challenge_ttl_secs: i64,
}

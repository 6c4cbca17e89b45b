//! OpenAPI documentation configuration
//!
//! Generates OpenAPI 3.0 specification for the QuantaVerse API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::db::{
    CommentRecord, PostListResponse, PostRecord, PublicUser, UpdatePost, UserResponse,
};
use crate::handlers::{
    AvailabilityRequest, AvailabilityResponse, CommentListResponse, CommentResponse,
    CreateCommentRequest, CreatePostRequest, DeactivateResponse, HealthResponse,
    LoginChallengeRequest, LoginChallengeResponse, LogoutResponse, PostActionResponse,
    PostResponse, ProfileResponse, PublicUserResponse, ReadyResponse, RefreshRequest,
    RefreshResponse, RegisterRequest, RegisterResponse, SessionResponse, UpdateProfileRequest,
    UserStatsResponse, VerifyChallengeRequest,
};

/// QuantaVerse API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QuantaVerse API",
        version = "0.1.0",
        description = r#"
## Post-Quantum Social Networking API

QuantaVerse replaces passwords with **post-quantum key pairs**:

- **Kyber-512** - KEM public key stored at registration
- **Dilithium2** - signature key that answers login challenges
- **Challenge/response login** - the server issues a random challenge, the
  client signs it with a locally-held private key, the server verifies the
  signature through a PQC microservice and issues a session token

### How login works

1. `POST /api/auth/login-challenge` with a username or email
2. Sign the returned challenge string with your Dilithium private key
3. `POST /api/auth/verify-challenge` with the signature
4. Use the returned bearer token on authenticated endpoints

Private keys never reach this server.
"#,
        license(
            name = "MIT OR Apache-2.0",
            url = "https://github.com/quantaverse/quantaverse/blob/main/LICENSE"
        ),
        contact(
            name = "QuantaVerse Team",
            url = "https://github.com/quantaverse/quantaverse"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Auth", description = "Registration and challenge/response login"),
        (name = "Users", description = "Profiles, account lifecycle, activity stats"),
        (name = "Posts", description = "The public feed and post management"),
        (name = "Comments", description = "Comments on posts"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::auth::register,
        crate::handlers::auth::check_availability,
        crate::handlers::auth::login_challenge,
        crate::handlers::auth::verify_challenge,
        crate::handlers::auth::refresh_token,
        crate::handlers::auth::logout,
        crate::handlers::users::get_profile,
        crate::handlers::users::update_profile,
        crate::handlers::users::deactivate_account,
        crate::handlers::users::get_user_stats,
        crate::handlers::users::get_user,
        crate::handlers::posts::create_post,
        crate::handlers::posts::list_posts,
        crate::handlers::posts::get_post,
        crate::handlers::posts::update_post,
        crate::handlers::posts::delete_post,
        crate::handlers::posts::like_post,
        crate::handlers::posts::share_post,
        crate::handlers::comments::add_comment,
        crate::handlers::comments::list_comments,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            RegisterRequest,
            RegisterResponse,
            AvailabilityRequest,
            AvailabilityResponse,
            LoginChallengeRequest,
            LoginChallengeResponse,
            VerifyChallengeRequest,
            SessionResponse,
            RefreshRequest,
            RefreshResponse,
            LogoutResponse,
            ProfileResponse,
            UpdateProfileRequest,
            DeactivateResponse,
            UserStatsResponse,
            PublicUserResponse,
            UserResponse,
            PublicUser,
            CreatePostRequest,
            PostResponse,
            PostActionResponse,
            PostRecord,
            PostListResponse,
            UpdatePost,
            CreateCommentRequest,
            CommentResponse,
            CommentListResponse,
            CommentRecord,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer-token security scheme referenced by handlers.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//! Authentication handlers
//!
//! Implements the challenge/response login protocol: registration stores
//! the user's Kyber/Dilithium public keys; login issues a random challenge
//! that the client signs with its locally-held Dilithium private key; the
//! server verifies the signature through the PQC service and issues a
//! session token.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use quantaverse_core::{DilithiumPublicKey, DilithiumSignature, KyberPublicKey, LoginChallenge};

use crate::db::{CreateUser, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate_email, validate_username};

/// Request to register a new user
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired username (3-30 characters)
    #[schema(example = "alice")]
    pub username: String,
    /// Email address
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Base64 Kyber-512 public key
    pub kyber_public_key: String,
    /// Base64 Dilithium2 public key
    pub dilithium_public_key: String,
}

/// Response for successful registration
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserResponse,
}

/// Request to check username/email availability
#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
}

/// Availability check result
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request for a login challenge
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginChallengeRequest {
    /// Username or email
    #[schema(example = "alice")]
    pub identifier: String,
}

/// Response carrying the challenge to sign
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginChallengeResponse {
    /// Hex-encoded challenge; sign its UTF-8 bytes with the Dilithium key
    pub challenge: String,
    /// Identifier to present on verification
    pub challenge_id: String,
    /// The user the challenge was issued to
    #[schema(value_type = String)]
    pub user_id: Uuid,
    /// When the challenge stops being acceptable
    #[schema(value_type = String)]
    pub expires_at: DateTime<Utc>,
}

/// Request to verify a signed challenge
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyChallengeRequest {
    #[schema(value_type = String)]
    pub user_id: Uuid,
    pub challenge_id: String,
    /// Base64 Dilithium2 signature over the challenge string
    pub signature: String,
}

/// Response for a successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user: UserResponse,
}

/// Request to refresh a session token
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub token: String,
}

/// Response carrying a fresh token
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub token: String,
}

/// Logout acknowledgment
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/auth/register
///
/// Register a new user with their post-quantum public keys. Both keys are
/// structurally validated locally, then checked for well-formedness by the
/// PQC service before the user row is written.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid payload or malformed keys"),
        (status = 409, description = "Username or email already exists"),
        (status = 503, description = "Database or PQC service unavailable")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    validate_username(&req.username)?;
    validate_email(&req.email)?;

    // Structural checks before spending a PQC round trip
    let kyber_key = KyberPublicKey::parse(&req.kyber_public_key)?;
    let dilithium_key = DilithiumPublicKey::parse(&req.dilithium_public_key)?;

    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    if let Some(existing) = user_repo
        .find_conflicting(&req.username, &req.email)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
    {
        let message = if existing.username == req.username {
            "Username already taken"
        } else {
            "Email already registered"
        };
        return Err(ApiError::conflict(message));
    }

    let (kyber_valid, dilithium_valid) = tokio::join!(
        state.pqc.validate_kyber_key(kyber_key.as_str()),
        state.pqc.validate_dilithium_key(dilithium_key.as_str()),
    );

    if !(kyber_valid? && dilithium_valid?) {
        return Err(ApiError::bad_request(
            "Invalid post-quantum cryptographic keys",
        ));
    }

    let user = user_repo
        .create(CreateUser {
            username: req.username,
            email: req.email,
            kyber_public_key: kyber_key.as_str().to_string(),
            dilithium_public_key: dilithium_key.as_str().to_string(),
        })
        .await
        .map_err(|e| match &e {
            // Unique-constraint race between the conflict check and the insert
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::conflict("Username or email already exists")
            }
            _ => ApiError::internal(format!("Failed to create user: {e}")),
        })?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from(user),
        }),
    ))
}

/// POST /api/auth/check-availability
///
/// Check whether a username/email pair is still free. Taken pairs answer
/// 409 with a message naming the colliding field.
#[utoipa::path(
    post,
    path = "/api/auth/check-availability",
    tag = "Auth",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Pair is available", body = AvailabilityResponse),
        (status = 409, description = "Username or email taken", body = AvailabilityResponse),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<(StatusCode, Json<AvailabilityResponse>), ApiError> {
    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    match user_repo
        .find_conflicting(&req.username, &req.email)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
    {
        Some(existing) => {
            let message = if existing.username == req.username {
                "Username already taken"
            } else {
                "Email already registered"
            };
            Ok((
                StatusCode::CONFLICT,
                Json(AvailabilityResponse {
                    available: false,
                    message: Some(message.to_string()),
                }),
            ))
        }
        None => Ok((
            StatusCode::OK,
            Json(AvailabilityResponse {
                available: true,
                message: None,
            }),
        )),
    }
}

/// POST /api/auth/login-challenge
///
/// Issue a login challenge for a username or email. The challenge lives in
/// the in-memory store for five minutes and is consumed by the first
/// verification attempt.
#[utoipa::path(
    post,
    path = "/api/auth/login-challenge",
    tag = "Auth",
    request_body = LoginChallengeRequest,
    responses(
        (status = 200, description = "Challenge issued", body = LoginChallengeResponse),
        (status = 404, description = "Unknown or deactivated user"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn login_challenge(
    State(state): State<AppState>,
    Json(req): Json<LoginChallengeRequest>,
) -> Result<Json<LoginChallengeResponse>, ApiError> {
    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = user_repo
        .find_by_identifier(&req.identifier)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let challenge =
        LoginChallenge::generate_with_ttl(Duration::seconds(state.challenge_ttl_secs));

    state.challenges.store(
        challenge.challenge_id.clone(),
        user.id,
        challenge.challenge.clone(),
        state.challenge_ttl_secs.max(0) as u64,
    );

    tracing::info!(
        user_id = %user.id,
        challenge_id = %challenge.challenge_id,
        "Login challenge issued"
    );

    Ok(Json(LoginChallengeResponse {
        challenge: challenge.challenge,
        challenge_id: challenge.challenge_id,
        user_id: user.id,
        expires_at: challenge.expires_at,
    }))
}

/// POST /api/auth/verify-challenge
///
/// Verify a signed login challenge and issue a session token. The stored
/// challenge is consumed before the signature is checked, so a failed
/// attempt burns the challenge.
#[utoipa::path(
    post,
    path = "/api/auth/verify-challenge",
    tag = "Auth",
    request_body = VerifyChallengeRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Malformed signature"),
        (status = 401, description = "Invalid, expired, or mismatched challenge; bad signature"),
        (status = 404, description = "Unknown user"),
        (status = 503, description = "Database or PQC service unavailable")
    )
)]
pub async fn verify_challenge(
    State(state): State<AppState>,
    Json(req): Json<VerifyChallengeRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let signature = DilithiumSignature::parse(&req.signature)?;

    let pending = state.challenges.take(&req.challenge_id).ok_or_else(|| {
        ApiError::auth_error("AUTH_CHALLENGE_INVALID", "Invalid or expired challenge")
    })?;

    if pending.user_id != req.user_id {
        return Err(ApiError::auth_error(
            "AUTH_CHALLENGE_MISMATCH",
            "Challenge was not issued to this user",
        ));
    }

    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = user_repo
        .find_by_id(req.user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let valid = state
        .pqc
        .verify_signature(
            &pending.challenge,
            signature.as_str(),
            &user.dilithium_public_key,
        )
        .await?;

    if !valid {
        tracing::warn!(user_id = %user.id, "Login attempt with invalid signature");
        return Err(ApiError::auth_error(
            "AUTH_INVALID_SIGNATURE",
            "Signature verification failed",
        ));
    }

    user_repo
        .record_login(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?;

    let token = state.jwt.issue(&user)?;

    tracing::info!(user_id = %user.id, username = %user.username, "Login successful");

    Ok(Json(SessionResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// POST /api/auth/refresh
///
/// Exchange a valid (unexpired) session token for a fresh one.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Fresh token issued", body = RefreshResponse),
        (status = 401, description = "Invalid or expired token"),
        (status = 404, description = "User no longer exists"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let claims = state.jwt.validate(&req.token)?;

    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = user_repo
        .find_by_id(claims.sub)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {e}")))?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let token = state.jwt.issue(&user)?;

    Ok(Json(RefreshResponse { token }))
}

/// POST /api/auth/logout
///
/// Stateless acknowledgment; the client discards its token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse)
    )
)]
pub async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    })
}

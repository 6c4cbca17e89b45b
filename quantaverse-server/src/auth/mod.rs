//! Session token module
//!
//! Provides JWT issuance/validation and the `AuthenticatedUser` extractor
//! for Axum handlers. Tokens are HS256 with a shared secret and a 24-hour
//! default lifetime; a token is only as good as the user row behind it, so
//! the extractor re-checks the account on every request.

mod challenges;

pub use challenges::{ChallengeStore, PendingChallenge};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::User;
use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims for a QuantaVerse session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: user id
    pub sub: Uuid,
    /// Username at issue time (convenience for logging and display)
    pub username: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch, validated by jsonwebtoken)
    pub exp: i64,
}

/// HS256 key pair plus token lifetime
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl JwtKeys {
    /// Create keys from a shared secret
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    /// Issue a session token for a user
    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id,
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode session token");
            ApiError::internal("Failed to issue session token")
        })
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<SessionClaims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::auth_error("AUTH_TOKEN_EXPIRED", "Session token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    ApiError::auth_error("AUTH_INVALID_TOKEN", "Invalid token signature")
                }
                _ => ApiError::auth_error(
                    "AUTH_INVALID_TOKEN",
                    format!("Token validation failed: {e}"),
                ),
            },
        )?;

        Ok(token_data.claims)
    }
}

/// Extract the Bearer token from the Authorization header
fn extract_bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::auth_error("AUTH_MISSING_TOKEN", "Missing Authorization header")
        })?;

    let auth_value = auth_header.to_str().map_err(|_| {
        ApiError::auth_error(
            "AUTH_INVALID_TOKEN",
            "Invalid Authorization header encoding",
        )
    })?;

    auth_value.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::auth_error(
            "AUTH_INVALID_TOKEN",
            "Authorization header must use Bearer scheme",
        )
    })
}

/// Authenticated user extractor that validates the session token and
/// resolves the user from the database.
///
/// The extractor:
/// 1. Reads `Authorization: Bearer <token>` header
/// 2. Validates the HS256 signature and expiry
/// 3. Looks up the user by id and confirms the account is active
///
/// Returns 401 with structured error codes on any failure.
pub struct AuthenticatedUser {
    pub user: User,
    pub claims: SessionClaims,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let claims = state.jwt.validate(token)?;

        let user_repo = state
            .user_repo
            .as_ref()
            .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

        let user = user_repo
            .find_by_id(claims.sub)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to look up user for session token");
                ApiError::internal("A database error occurred")
            })?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                ApiError::auth_error(
                    "AUTH_USER_NOT_FOUND",
                    "Valid token but user is unknown or deactivated",
                )
            })?;

        Ok(AuthenticatedUser { user, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            kyber_public_key: "a2V5".to_string(),
            dilithium_public_key: "c2ln".to_string(),
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let keys = JwtKeys::new("test-secret", 24);
        let user = test_user();

        let token = keys.issue(&user).unwrap();
        let claims = keys.validate(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let keys = JwtKeys::new("secret-a", 24);
        let other = JwtKeys::new("secret-b", 24);
        let token = keys.issue(&test_user()).unwrap();

        let err = other.validate(&token).unwrap_err();
        match err {
            ApiError::AuthError { code, .. } => assert_eq!(code, "AUTH_INVALID_TOKEN"),
            other => panic!("Expected AuthError with AUTH_INVALID_TOKEN, got: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        let keys = JwtKeys::new("test-secret", -1);
        let token = keys.issue(&test_user()).unwrap();

        let err = keys.validate(&token).unwrap_err();
        match err {
            ApiError::AuthError { code, .. } => assert_eq!(code, "AUTH_TOKEN_EXPIRED"),
            other => panic!("Expected AuthError with AUTH_TOKEN_EXPIRED, got: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let keys = JwtKeys::new("test-secret", 24);
        let err = keys.validate("not-a-valid-jwt").unwrap_err();
        match err {
            ApiError::AuthError { code, .. } => assert_eq!(code, "AUTH_INVALID_TOKEN"),
            other => panic!("Expected AuthError with AUTH_INVALID_TOKEN, got: {other:?}"),
        }
    }

    #[test]
    fn test_extract_bearer_token_missing_header() {
        let (parts, _) = axum::http::Request::builder()
            .body(())
            .unwrap()
            .into_parts();

        let err = extract_bearer_token(&parts).unwrap_err();
        match err {
            ApiError::AuthError { code, .. } => assert_eq!(code, "AUTH_MISSING_TOKEN"),
            other => panic!("Expected AuthError with AUTH_MISSING_TOKEN, got: {other:?}"),
        }
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let (parts, _) = axum::http::Request::builder()
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap()
            .into_parts();

        let err = extract_bearer_token(&parts).unwrap_err();
        match err {
            ApiError::AuthError { code, .. } => assert_eq!(code, "AUTH_INVALID_TOKEN"),
            other => panic!("Expected AuthError with AUTH_INVALID_TOKEN, got: {other:?}"),
        }
    }

    #[test]
    fn test_extract_bearer_token_success() {
        let (parts, _) = axum::http::Request::builder()
            .header("Authorization", "Bearer my-session-token")
            .body(())
            .unwrap()
            .into_parts();

        let token = extract_bearer_token(&parts).unwrap();
        assert_eq!(token, "my-session-token");
    }
}

//! User entity and repository
//!
//! Users carry no password: the stored Kyber/Dilithium public keys are the
//! credential, and the Dilithium key is what login challenges verify against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

/// User entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub kyber_public_key: String,
    pub dilithium_public_key: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub kyber_public_key: String,
    pub dilithium_public_key: String,
}

/// Own-profile response DTO (includes public keys, never private material)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// User unique identifier
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Username
    #[schema(example = "alice")]
    pub username: String,
    /// Email address
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Base64 Kyber-512 public key
    pub kyber_public_key: String,
    /// Base64 Dilithium2 public key
    pub dilithium_public_key: String,
    /// Last successful login
    #[schema(value_type = Option<String>)]
    pub last_login_at: Option<DateTime<Utc>>,
    /// Account creation timestamp
    #[schema(value_type = String, example = "2026-01-08T10:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            kyber_public_key: user.kyber_public_key,
            dilithium_public_key: user.dilithium_public_key,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Public view of another user (no email, no keys)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicUser {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    pub is_active: bool,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, kyber_public_key, dilithium_public_key, \
                            is_active, last_login_at, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find user by internal ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find user by username or email (login identifier)
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = LOWER($1)"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a user whose username or email collides with the given pair.
    ///
    /// Used by registration and the availability check to report which
    /// field is taken.
    pub async fn find_conflicting(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = LOWER($2)"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Create a new user
    pub async fn create(&self, input: CreateUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, kyber_public_key, dilithium_public_key)
            VALUES ($1, LOWER($2), $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.kyber_public_key)
        .bind(&input.dilithium_public_key)
        .fetch_one(&self.pool)
        .await
    }

    /// Record a successful login
    pub async fn record_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Update a user's email
    pub async fn update_email(&self, id: Uuid, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = LOWER($2), updated_at = NOW()
            WHERE id = $1 AND is_active
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deactivate a user account. Deactivated users keep their posts and
    /// comments but can no longer obtain login challenges.
    pub async fn deactivate(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

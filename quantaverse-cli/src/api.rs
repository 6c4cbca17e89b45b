//! Thin client for the QuantaVerse server API.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

/// Profile fields as returned by the server.
#[derive(Debug, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct LoginChallengeResponse {
    pub challenge: String,
    pub challenge_id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// Error body shape shared by all server endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// Client for the server's REST API.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    async fn handle<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<R>()
                .await
                .context("Failed to parse server response");
        }

        // Surface the server's structured error when present
        match response.json::<ErrorBody>().await {
            Ok(body) => {
                let code = body.code.unwrap_or_else(|| status.to_string());
                bail!("Server answered {status}: {} ({code})", body.error)
            }
            Err(_) => bail!("Server answered {status}"),
        }
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        debug!(path, "POST");
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to server at {}", self.base_url))?;
        Self::handle(response).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        kyber_public_key: &str,
        dilithium_public_key: &str,
    ) -> Result<RegisterResponse> {
        self.post(
            "/api/auth/register",
            &json!({
                "username": username,
                "email": email,
                "kyber_public_key": kyber_public_key,
                "dilithium_public_key": dilithium_public_key,
            }),
        )
        .await
    }

    pub async fn login_challenge(&self, identifier: &str) -> Result<LoginChallengeResponse> {
        self.post(
            "/api/auth/login-challenge",
            &json!({"identifier": identifier}),
        )
        .await
    }

    pub async fn verify_challenge(
        &self,
        user_id: Uuid,
        challenge_id: &str,
        signature: &str,
    ) -> Result<SessionResponse> {
        self.post(
            "/api/auth/verify-challenge",
            &json!({
                "user_id": user_id,
                "challenge_id": challenge_id,
                "signature": signature,
            }),
        )
        .await
    }

    pub async fn whoami(&self, token: &str) -> Result<ProfileResponse> {
        debug!("GET /api/users/me");
        let response = self
            .client
            .get(format!("{}/api/users/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Failed to connect to server at {}", self.base_url))?;
        Self::handle(response).await
    }
}

//! HTTP client for the external PQC microservice.
//!
//! The microservice wraps liboqs (Kyber-512 + Dilithium2) and exposes the
//! primitive operations as JSON endpoints. This client adds:
//!
//! - Automatic retry with exponential backoff on transient errors
//! - Configurable endpoint and timeout
//! - Full observability with tracing instrumentation

use async_trait::async_trait;
use backoff::{future::retry_notify, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::{PqcEndpoint, PqcProvider};
use crate::error::{QuantaError, Result};
use crate::keys::Keypair;

/// Default PQC service endpoint (loopback, as deployed alongside the server).
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of retry attempts.
const MAX_RETRIES: u32 = 3;

/// Initial retry interval.
const INITIAL_INTERVAL: Duration = Duration::from_millis(100);

/// Maximum retry interval.
const MAX_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration for the PQC bridge client.
#[derive(Debug, Clone)]
pub struct PqcBridgeConfig {
    /// Service base URL, without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for transient errors.
    pub max_retries: u32,
}

impl Default for PqcBridgeConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("PQC_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: DEFAULT_TIMEOUT,
            max_retries: MAX_RETRIES,
        }
    }
}

// ---- Wire types (match the microservice's JSON) ----

#[derive(Serialize)]
struct ValidateKeyRequest<'a> {
    #[serde(rename = "publicKey")]
    public_key: &'a str,
}

#[derive(Deserialize)]
struct ValidateKeyResponse {
    valid: bool,
}

#[derive(Serialize)]
struct SignRequest<'a> {
    message: &'a str,
    #[serde(rename = "privateKey")]
    private_key: &'a str,
}

#[derive(Deserialize)]
struct SignResponse {
    data: String,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    message: &'a str,
    signature: &'a str,
    #[serde(rename = "publicKey")]
    public_key: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    data: bool,
}

#[derive(Deserialize)]
struct KeypairResponse {
    data: Keypair,
}

/// HTTP client for the PQC microservice.
///
/// ## Example
///
/// ```no_run
/// use quantaverse_core::pqc::{PqcBridge, PqcProvider};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pqc = PqcBridge::new()?;
/// let valid = pqc.validate_dilithium_key("base64-key...").await?;
/// # Ok(())
/// # }
/// ```
pub struct PqcBridge {
    client: Client,
    config: PqcBridgeConfig,
}

impl PqcBridge {
    /// Create a new bridge client with default settings.
    #[instrument(level = "debug", skip_all)]
    pub fn new() -> Result<Self> {
        Self::with_config(PqcBridgeConfig::default())
    }

    /// Create a new bridge client with custom configuration.
    #[instrument(level = "debug", skip_all, fields(
        base_url = %config.base_url,
        timeout_ms = config.timeout.as_millis() as u64,
        max_retries = config.max_retries
    ))]
    pub fn with_config(config: PqcBridgeConfig) -> Result<Self> {
        debug!("Creating PQC bridge client");

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                warn!(error = %e, "Failed to create HTTP client");
                QuantaError::PqcError(format!("Failed to create HTTP client: {e}"))
            })?;

        info!("PQC bridge client created successfully");
        Ok(Self { client, config })
    }

    /// Check if an error is transient and should be retried.
    fn is_transient_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect() || error.is_request()
    }

    /// Check if an HTTP status code indicates a transient error.
    fn is_transient_status(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
                | StatusCode::BAD_GATEWAY
        )
    }

    /// Build exponential backoff configuration.
    fn build_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: INITIAL_INTERVAL,
            max_interval: MAX_INTERVAL,
            max_elapsed_time: Some(self.config.timeout * self.config.max_retries),
            ..Default::default()
        }
    }

    /// One POST attempt against `path`, classified for retry.
    async fn post_once<B, R>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<R, backoff::Error<QuantaError>>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.config.base_url);
        let start = Instant::now();

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            let latency_ms = start.elapsed().as_millis();
            if Self::is_transient_error(&e) {
                warn!(error = %e, latency_ms = latency_ms as u64, "Transient error, will retry");
                backoff::Error::transient(QuantaError::PqcError(format!(
                    "Transient error (will retry): {e}"
                )))
            } else {
                warn!(error = %e, latency_ms = latency_ms as u64, "Permanent error, aborting");
                backoff::Error::permanent(QuantaError::PqcError(format!(
                    "PQC service request failed: {e}"
                )))
            }
        })?;

        let status = response.status();
        debug!(status = %status, path, "Received HTTP response");

        if !status.is_success() {
            let err = QuantaError::PqcError(format!("PQC service returned status: {status}"));
            return if Self::is_transient_status(status) {
                Err(backoff::Error::transient(err))
            } else {
                Err(backoff::Error::permanent(err))
            };
        }

        response.json::<R>().await.map_err(|e| {
            warn!(error = %e, path, "Failed to parse JSON response");
            backoff::Error::permanent(QuantaError::SerializationError(format!(
                "Failed to parse PQC service response: {e}"
            )))
        })
    }

    /// POST with retry on transient failures.
    async fn post_with_retry<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let backoff = self.build_backoff();

        retry_notify(
            backoff,
            || async { self.post_once(path, body).await },
            |err: QuantaError, duration: Duration| {
                warn!(
                    error = %err,
                    retry_after_ms = duration.as_millis() as u64,
                    "Retry scheduled"
                );
            },
        )
        .await
    }
}

#[async_trait]
impl PqcProvider for PqcBridge {
    #[instrument(level = "debug", skip_all, fields(key_len = public_key.len()))]
    async fn validate_kyber_key(&self, public_key: &str) -> Result<bool> {
        let response: ValidateKeyResponse = self
            .post_with_retry("/kyber/validate-key", &ValidateKeyRequest { public_key })
            .await?;
        Ok(response.valid)
    }

    #[instrument(level = "debug", skip_all, fields(key_len = public_key.len()))]
    async fn validate_dilithium_key(&self, public_key: &str) -> Result<bool> {
        let response: ValidateKeyResponse = self
            .post_with_retry("/dilithium/validate-key", &ValidateKeyRequest { public_key })
            .await?;
        Ok(response.valid)
    }

    #[instrument(level = "info", skip_all, fields(message_len = message.len()))]
    async fn verify_signature(
        &self,
        message: &str,
        signature: &str,
        public_key: &str,
    ) -> Result<bool> {
        let start = Instant::now();
        let response: VerifyResponse = self
            .post_with_retry(
                "/dilithium-verify",
                &VerifyRequest {
                    message,
                    signature,
                    public_key,
                },
            )
            .await?;

        info!(
            valid = response.data,
            latency_ms = start.elapsed().as_millis() as u64,
            "Signature verification completed"
        );
        Ok(response.data)
    }

    #[instrument(level = "debug", skip_all, fields(message_len = message.len()))]
    async fn sign(&self, message: &str, private_key: &str) -> Result<String> {
        let response: SignResponse = self
            .post_with_retry(
                "/dilithium-sign",
                &SignRequest {
                    message,
                    private_key,
                },
            )
            .await?;
        Ok(response.data)
    }

    #[instrument(level = "debug", skip_all)]
    async fn generate_kyber_keypair(&self) -> Result<Keypair> {
        let response: KeypairResponse = self
            .post_with_retry("/generate-kyber-keypair", &serde_json::json!({}))
            .await?;
        Ok(response.data)
    }

    #[instrument(level = "debug", skip_all)]
    async fn generate_dilithium_keypair(&self) -> Result<Keypair> {
        let response: KeypairResponse = self
            .post_with_retry("/generate-dilithium-keypair", &serde_json::json!({}))
            .await?;
        Ok(response.data)
    }

    #[instrument(level = "debug", skip_all)]
    async fn check_health(&self) -> Result<()> {
        let url = format!("{}/health", self.config.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(QuantaError::PqcError(format!(
                "PQC service health check returned status: {}",
                response.status()
            )))
        }
    }

    fn provider_id(&self) -> PqcEndpoint {
        PqcEndpoint::Bridge {
            base_url: self.config.base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PqcBridgeConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_retries, MAX_RETRIES);
    }

    #[test]
    fn test_create_client() {
        let bridge = PqcBridge::new();
        assert!(bridge.is_ok());
    }

    #[test]
    fn test_provider_id_carries_base_url() {
        let bridge = PqcBridge::with_config(PqcBridgeConfig {
            base_url: "http://pqc.internal:5001".to_string(),
            ..Default::default()
        })
        .unwrap();
        match bridge.provider_id() {
            PqcEndpoint::Bridge { base_url } => assert_eq!(base_url, "http://pqc.internal:5001"),
            other => panic!("Expected Bridge endpoint, got {other:?}"),
        }
    }

    #[test]
    fn test_transient_status_codes() {
        assert!(PqcBridge::is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(PqcBridge::is_transient_status(
            StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(PqcBridge::is_transient_status(StatusCode::GATEWAY_TIMEOUT));
        assert!(PqcBridge::is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!PqcBridge::is_transient_status(StatusCode::NOT_FOUND));
        assert!(!PqcBridge::is_transient_status(
            StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    // Note: integration test with a live PQC service is marked as ignored.
    // Run with: cargo test --package quantaverse-core test_bridge_live -- --ignored
    #[tokio::test]
    #[ignore = "requires a running PQC microservice"]
    async fn test_bridge_live() {
        let bridge = PqcBridge::new().unwrap();
        bridge.check_health().await.unwrap();
        let keypair = bridge.generate_dilithium_keypair().await.unwrap();
        let signature = bridge
            .sign("hello", keypair.private_key.expose())
            .await
            .unwrap();
        let valid = bridge
            .verify_signature("hello", &signature, &keypair.public_key)
            .await
            .unwrap();
        assert!(valid);
    }
}

//! Post-quantum cryptography provider.
//!
//! QuantaVerse never implements Kyber or Dilithium itself. All primitive
//! operations are delegated to an external PQC microservice over HTTP,
//! behind the [`PqcProvider`] trait:
//!
//! - **`PqcBridge`** - HTTP client for the real microservice
//! - **`MockPqc`** - deterministic offline provider (testing only)

mod bridge;
mod mock;

pub use bridge::{PqcBridge, PqcBridgeConfig};
pub use mock::MockPqc;

use async_trait::async_trait;

use crate::error::Result;
use crate::keys::Keypair;

/// Trait for PQC primitive operations.
///
/// Implementations must be thread-safe (`Send + Sync`). Key material and
/// signatures are base64 strings, matching the microservice's wire format.
///
/// Validation and verification calls distinguish "the service answered and
/// said no" (`Ok(false)`) from "the service could not answer" (`Err`).
#[async_trait]
pub trait PqcProvider: Send + Sync {
    /// Check that a base64 Kyber-512 public key is well-formed.
    async fn validate_kyber_key(&self, public_key: &str) -> Result<bool>;

    /// Check that a base64 Dilithium2 public key is well-formed.
    async fn validate_dilithium_key(&self, public_key: &str) -> Result<bool>;

    /// Verify a Dilithium2 signature over `message` with `public_key`.
    async fn verify_signature(
        &self,
        message: &str,
        signature: &str,
        public_key: &str,
    ) -> Result<bool>;

    /// Sign `message` with a Dilithium2 private key (client-side use).
    async fn sign(&self, message: &str, private_key: &str) -> Result<String>;

    /// Generate a fresh Kyber-512 keypair (client-side use).
    async fn generate_kyber_keypair(&self) -> Result<Keypair>;

    /// Generate a fresh Dilithium2 keypair (client-side use).
    async fn generate_dilithium_keypair(&self) -> Result<Keypair>;

    /// Probe the service's health endpoint.
    async fn check_health(&self) -> Result<()>;

    /// Returns the provider identifier for logging and health reporting.
    fn provider_id(&self) -> PqcEndpoint;
}

/// Identifies which PQC backend served an operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PqcEndpoint {
    /// The external liboqs-backed microservice.
    Bridge { base_url: String },
    /// Deterministic mock (NOT cryptographically meaningful!)
    Mock,
}

impl std::fmt::Display for PqcEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bridge { base_url } => write!(f, "PQC bridge at {base_url}"),
            Self::Mock => write!(f, "Mock (NOT QUANTUM-SAFE)"),
        }
    }
}

//! QuantaVerse Core - domain library for post-quantum authentication
//!
//! This crate provides the shared building blocks for the QuantaVerse
//! backend and client: key material types, login-challenge generation, and
//! the client for the external PQC microservice.
//!
//! # Features
//!
//! - Structural validation of Kyber-512 / Dilithium2 key material
//! - Single-use login challenges with TTL
//! - PQC operations delegated to a liboqs-backed microservice over HTTP
//! - Secret key zeroization on drop
//!
//! # Example
//!
//! ```no_run
//! use quantaverse_core::{LoginChallenge, MockPqc, PqcProvider};
//!
//! # async fn example() -> quantaverse_core::Result<()> {
//! // The server issues a challenge...
//! let challenge = LoginChallenge::generate();
//!
//! // ...the client signs it (here with the test mock)...
//! let pqc = MockPqc::default();
//! let keypair = pqc.generate_dilithium_keypair().await?;
//! let signature = pqc.sign(&challenge.challenge, keypair.private_key.expose()).await?;
//!
//! // ...and the server verifies the signature against the stored key.
//! assert!(pqc.verify_signature(&challenge.challenge, &signature, &keypair.public_key).await?);
//! # Ok(())
//! # }
//! ```

pub mod challenge;
pub mod error;
pub mod keys;
pub mod pqc;

// Re-export main types for convenience
pub use challenge::{LoginChallenge, CHALLENGE_BYTES, CHALLENGE_ID_BYTES, DEFAULT_CHALLENGE_TTL_SECS};
pub use error::{QuantaError, Result};
pub use keys::{
    DilithiumPublicKey, DilithiumSignature, Keypair, KyberPublicKey, SecretKeyMaterial,
    DILITHIUM2_PUBLIC_KEY_BYTES, DILITHIUM2_SIGNATURE_BYTES, KYBER512_PUBLIC_KEY_BYTES,
};
pub use pqc::{MockPqc, PqcBridge, PqcBridgeConfig, PqcEndpoint, PqcProvider};

#[cfg(test)]
mod tests {
    use super::*;

    /// Integration test: issue a challenge, sign it, verify the signature.
    #[tokio::test]
    async fn test_full_challenge_workflow() {
        let pqc = MockPqc::default();

        let keypair = pqc.generate_dilithium_keypair().await.unwrap();
        let public_key = DilithiumPublicKey::parse(&keypair.public_key)
            .expect("mock keys should be structurally valid");

        let challenge = LoginChallenge::generate();
        assert!(!challenge.is_expired());

        let signature = pqc
            .sign(&challenge.challenge, keypair.private_key.expose())
            .await
            .unwrap();
        let signature = DilithiumSignature::parse(&signature)
            .expect("mock signatures should be structurally valid");

        let valid = pqc
            .verify_signature(&challenge.challenge, signature.as_str(), public_key.as_str())
            .await
            .unwrap();
        assert!(valid, "signature over the issued challenge should verify");
    }

    /// A signature over one challenge must not verify against another.
    #[tokio::test]
    async fn test_signature_bound_to_challenge() {
        let pqc = MockPqc::default();
        let keypair = pqc.generate_dilithium_keypair().await.unwrap();

        let first = LoginChallenge::generate();
        let second = LoginChallenge::generate();

        let signature = pqc
            .sign(&first.challenge, keypair.private_key.expose())
            .await
            .unwrap();

        let valid = pqc
            .verify_signature(&second.challenge, &signature, &keypair.public_key)
            .await
            .unwrap();
        assert!(!valid, "signature must be bound to the exact challenge");
    }
}

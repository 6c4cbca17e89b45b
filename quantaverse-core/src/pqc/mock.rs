//! Mock PQC provider for testing.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::{PqcEndpoint, PqcProvider};
use crate::error::{QuantaError, Result};
use crate::keys::{
    Keypair, SecretKeyMaterial, DILITHIUM2_PUBLIC_KEY_BYTES, DILITHIUM2_SIGNATURE_BYTES,
    KYBER512_PUBLIC_KEY_BYTES,
};

/// Kyber-512 secret key size in bytes (mock output only).
const KYBER512_SECRET_KEY_BYTES: usize = 1632;

/// Dilithium2 secret key size in bytes (mock output only).
const DILITHIUM2_SECRET_KEY_BYTES: usize = 2528;

/// Bytes of the shared keypair fingerprint embedded at the head of both halves.
const FINGERPRINT_BYTES: usize = 8;

/// Mock PQC provider for testing.
/// WARNING: Do not use in production - produces structurally-shaped key
/// material and signatures with no cryptographic meaning!
///
/// Keys are the correct liboqs sizes so that structural validation passes.
/// Both halves of a keypair share a leading fingerprint, which is what lets
/// `sign`/`verify_signature` round-trip without real lattice math.
pub struct MockPqc {
    seed: u64,
    counter: AtomicU64,
}

impl MockPqc {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            counter: AtomicU64::new(0),
        }
    }

    /// Create a mock with default seed for simple tests.
    pub fn default_test() -> Self {
        Self::new(0xDEADBEEF_CAFEBABE)
    }

    /// FNV-1a over arbitrary bytes; the mock's stand-in for hashing.
    fn fnv1a(data: &[u8]) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for &b in data {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }

    /// Fill `len` bytes deterministically from a state via xorshift64.
    fn keystream(mut state: u64, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        while out.len() < len {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            out.extend_from_slice(&state.to_le_bytes());
        }
        out.truncate(len);
        out
    }

    /// Generate a keypair whose halves share a leading fingerprint.
    fn make_keypair(&self, label: &[u8], public_len: usize, secret_len: usize) -> Keypair {
        let nonce = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut state_input = label.to_vec();
        state_input.extend_from_slice(&self.seed.to_le_bytes());
        state_input.extend_from_slice(&nonce.to_le_bytes());
        let fingerprint = Self::fnv1a(&state_input).to_le_bytes();

        let mut public = fingerprint.to_vec();
        public.extend(Self::keystream(
            Self::fnv1a(&fingerprint).wrapping_add(1),
            public_len - FINGERPRINT_BYTES,
        ));

        let mut secret = fingerprint.to_vec();
        secret.extend(Self::keystream(
            Self::fnv1a(&fingerprint).wrapping_add(2),
            secret_len - FINGERPRINT_BYTES,
        ));

        Keypair {
            public_key: BASE64.encode(&public),
            private_key: SecretKeyMaterial::new(BASE64.encode(&secret)),
        }
    }

    fn decode(encoded: &str, what: &str) -> Result<Vec<u8>> {
        BASE64
            .decode(encoded.trim())
            .map_err(|e| QuantaError::KeyError(format!("{what} is not valid base64: {e}")))
    }
}

impl Default for MockPqc {
    fn default() -> Self {
        Self::default_test()
    }
}

#[async_trait]
impl PqcProvider for MockPqc {
    async fn validate_kyber_key(&self, public_key: &str) -> Result<bool> {
        let bytes = Self::decode(public_key, "Kyber public key")?;
        Ok(bytes.len() == KYBER512_PUBLIC_KEY_BYTES)
    }

    async fn validate_dilithium_key(&self, public_key: &str) -> Result<bool> {
        let bytes = Self::decode(public_key, "Dilithium public key")?;
        Ok(bytes.len() == DILITHIUM2_PUBLIC_KEY_BYTES)
    }

    async fn verify_signature(
        &self,
        message: &str,
        signature: &str,
        public_key: &str,
    ) -> Result<bool> {
        let signature = Self::decode(signature, "signature")?;
        let public = Self::decode(public_key, "Dilithium public key")?;

        if signature.len() != DILITHIUM2_SIGNATURE_BYTES
            || public.len() != DILITHIUM2_PUBLIC_KEY_BYTES
        {
            return Ok(false);
        }

        let message_tag = Self::fnv1a(message.as_bytes()).to_le_bytes();
        let tag_matches = signature[..FINGERPRINT_BYTES] == message_tag;
        let key_matches =
            signature[FINGERPRINT_BYTES..2 * FINGERPRINT_BYTES] == public[..FINGERPRINT_BYTES];

        Ok(tag_matches && key_matches)
    }

    async fn sign(&self, message: &str, private_key: &str) -> Result<String> {
        let secret = Self::decode(private_key, "Dilithium private key")?;
        if secret.len() < FINGERPRINT_BYTES {
            return Err(QuantaError::KeyError(
                "Dilithium private key too short".into(),
            ));
        }

        let mut signature = Self::fnv1a(message.as_bytes()).to_le_bytes().to_vec();
        signature.extend_from_slice(&secret[..FINGERPRINT_BYTES]);
        signature.extend(Self::keystream(
            Self::fnv1a(&signature),
            DILITHIUM2_SIGNATURE_BYTES - 2 * FINGERPRINT_BYTES,
        ));

        Ok(BASE64.encode(&signature))
    }

    async fn generate_kyber_keypair(&self) -> Result<Keypair> {
        Ok(self.make_keypair(b"mock-kyber", KYBER512_PUBLIC_KEY_BYTES, KYBER512_SECRET_KEY_BYTES))
    }

    async fn generate_dilithium_keypair(&self) -> Result<Keypair> {
        Ok(self.make_keypair(
            b"mock-dilithium",
            DILITHIUM2_PUBLIC_KEY_BYTES,
            DILITHIUM2_SECRET_KEY_BYTES,
        ))
    }

    async fn check_health(&self) -> Result<()> {
        Ok(())
    }

    fn provider_id(&self) -> PqcEndpoint {
        PqcEndpoint::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_keys_validate() {
        let pqc = MockPqc::default();

        let kyber = pqc.generate_kyber_keypair().await.unwrap();
        assert!(pqc.validate_kyber_key(&kyber.public_key).await.unwrap());

        let dilithium = pqc.generate_dilithium_keypair().await.unwrap();
        assert!(pqc
            .validate_dilithium_key(&dilithium.public_key)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_sign_verify_roundtrip() {
        let pqc = MockPqc::default();
        let keypair = pqc.generate_dilithium_keypair().await.unwrap();

        let signature = pqc
            .sign("challenge-bytes", keypair.private_key.expose())
            .await
            .unwrap();
        let valid = pqc
            .verify_signature("challenge-bytes", &signature, &keypair.public_key)
            .await
            .unwrap();
        assert!(valid);
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_message() {
        let pqc = MockPqc::default();
        let keypair = pqc.generate_dilithium_keypair().await.unwrap();

        let signature = pqc
            .sign("original", keypair.private_key.expose())
            .await
            .unwrap();
        let valid = pqc
            .verify_signature("tampered", &signature, &keypair.public_key)
            .await
            .unwrap();
        assert!(!valid);
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_key() {
        let pqc = MockPqc::default();
        let keypair = pqc.generate_dilithium_keypair().await.unwrap();
        let other = pqc.generate_dilithium_keypair().await.unwrap();

        let signature = pqc
            .sign("message", keypair.private_key.expose())
            .await
            .unwrap();
        let valid = pqc
            .verify_signature("message", &signature, &other.public_key)
            .await
            .unwrap();
        assert!(!valid);
    }

    #[tokio::test]
    async fn test_wrong_length_key_is_invalid_not_error() {
        let pqc = MockPqc::default();
        let short = BASE64.encode([0u8; 16]);
        assert!(!pqc.validate_kyber_key(&short).await.unwrap());
        assert!(!pqc.validate_dilithium_key(&short).await.unwrap());
    }

    #[tokio::test]
    async fn test_keypairs_are_unique() {
        let pqc = MockPqc::default();
        let a = pqc.generate_dilithium_keypair().await.unwrap();
        let b = pqc.generate_dilithium_keypair().await.unwrap();
        assert_ne!(a.public_key, b.public_key);
    }
}

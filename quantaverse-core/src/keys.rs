//! Post-quantum key and signature material.
//!
//! All key material crosses the wire as base64 strings. The actual
//! Kyber/Dilithium operations happen inside the external PQC service;
//! this module only knows the expected shapes and validates them
//! structurally before anything touches the network or the database.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{QuantaError, Result};

/// Kyber-512 public key size in bytes (NIST level 1 KEM).
pub const KYBER512_PUBLIC_KEY_BYTES: usize = 800;

/// Dilithium2 public key size in bytes (NIST level 2 signature).
pub const DILITHIUM2_PUBLIC_KEY_BYTES: usize = 1312;

/// Dilithium2 signature size in bytes.
pub const DILITHIUM2_SIGNATURE_BYTES: usize = 2420;

/// Decode a base64 string and check it has exactly `expected` bytes.
fn decode_exact(encoded: &str, expected: usize, what: &str) -> std::result::Result<Vec<u8>, String> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| format!("{what} is not valid base64: {e}"))?;

    if bytes.len() != expected {
        return Err(format!(
            "{what} has {} bytes, expected {expected}",
            bytes.len()
        ));
    }

    Ok(bytes)
}

/// A base64-encoded Kyber-512 public key.
///
/// Parsing only checks structure (valid base64, exact decoded length).
/// Whether the key is a well-formed lattice point is decided by the
/// PQC service's validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KyberPublicKey(String);

impl KyberPublicKey {
    pub fn parse(encoded: &str) -> Result<Self> {
        decode_exact(encoded, KYBER512_PUBLIC_KEY_BYTES, "Kyber public key")
            .map_err(QuantaError::KeyError)?;
        Ok(Self(encoded.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A base64-encoded Dilithium2 public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DilithiumPublicKey(String);

impl DilithiumPublicKey {
    pub fn parse(encoded: &str) -> Result<Self> {
        decode_exact(encoded, DILITHIUM2_PUBLIC_KEY_BYTES, "Dilithium public key")
            .map_err(QuantaError::KeyError)?;
        Ok(Self(encoded.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A base64-encoded Dilithium2 signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DilithiumSignature(String);

impl DilithiumSignature {
    pub fn parse(encoded: &str) -> Result<Self> {
        decode_exact(encoded, DILITHIUM2_SIGNATURE_BYTES, "Dilithium signature")
            .map_err(QuantaError::SignatureError)?;
        Ok(Self(encoded.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A private key held in client memory, zeroized on drop.
///
/// The server never constructs this type; private keys only exist on the
/// client side, and only leave it toward the local PQC signing service.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SecretKeyMaterial(String);

impl SecretKeyMaterial {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKeyMaterial([REDACTED])")
    }
}

/// A public/private key pair as returned by the PQC service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keypair {
    #[serde(rename = "publicKey")]
    pub public_key: String,
    #[serde(rename = "privateKey")]
    pub private_key: SecretKeyMaterial,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b64_of_len(len: usize) -> String {
        BASE64.encode(vec![0x42u8; len])
    }

    #[test]
    fn test_kyber_key_valid() {
        let key = KyberPublicKey::parse(&b64_of_len(KYBER512_PUBLIC_KEY_BYTES)).unwrap();
        assert!(!key.as_str().is_empty());
    }

    #[test]
    fn test_kyber_key_wrong_length() {
        assert!(KyberPublicKey::parse(&b64_of_len(799)).is_err());
        assert!(KyberPublicKey::parse(&b64_of_len(801)).is_err());
    }

    #[test]
    fn test_kyber_key_invalid_base64() {
        assert!(KyberPublicKey::parse("!!!not-base64!!!").is_err());
    }

    #[test]
    fn test_dilithium_key_valid() {
        assert!(DilithiumPublicKey::parse(&b64_of_len(DILITHIUM2_PUBLIC_KEY_BYTES)).is_ok());
    }

    #[test]
    fn test_dilithium_signature_valid() {
        assert!(DilithiumSignature::parse(&b64_of_len(DILITHIUM2_SIGNATURE_BYTES)).is_ok());
    }

    #[test]
    fn test_dilithium_signature_wrong_length() {
        assert!(DilithiumSignature::parse(&b64_of_len(64)).is_err());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let encoded = format!("  {}\n", b64_of_len(KYBER512_PUBLIC_KEY_BYTES));
        let key = KyberPublicKey::parse(&encoded).unwrap();
        assert!(!key.as_str().contains(' '));
    }

    #[test]
    fn test_secret_key_debug_redacted() {
        let secret = SecretKeyMaterial::new("super-secret-key");
        assert_eq!(format!("{secret:?}"), "SecretKeyMaterial([REDACTED])");
    }
}

//! Login challenge generation.
//!
//! The server answers a login request with a random challenge that the
//! client must sign with its Dilithium private key. Challenges are
//! short-lived and single-use; the consuming store enforces both.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

/// Random bytes in the challenge itself (hex-encoded to 64 chars).
pub const CHALLENGE_BYTES: usize = 32;

/// Random bytes in the challenge identifier (hex-encoded to 32 chars).
pub const CHALLENGE_ID_BYTES: usize = 16;

/// Default challenge lifetime: 5 minutes.
pub const DEFAULT_CHALLENGE_TTL_SECS: i64 = 300;

/// A login challenge issued to a specific user.
///
/// The `challenge` field is the exact string the client signs: the
/// signature covers its UTF-8 bytes, not the decoded hex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginChallenge {
    /// Hex-encoded random challenge to be signed.
    pub challenge: String,
    /// Hex-encoded identifier used to look the challenge up on verification.
    pub challenge_id: String,
    /// When the challenge was created.
    pub issued_at: DateTime<Utc>,
    /// When the challenge stops being acceptable.
    pub expires_at: DateTime<Utc>,
}

impl LoginChallenge {
    /// Generate a fresh challenge with the default 5-minute lifetime.
    pub fn generate() -> Self {
        Self::generate_with_ttl(Duration::seconds(DEFAULT_CHALLENGE_TTL_SECS))
    }

    /// Generate a fresh challenge with a custom lifetime.
    pub fn generate_with_ttl(ttl: Duration) -> Self {
        let mut challenge = [0u8; CHALLENGE_BYTES];
        let mut challenge_id = [0u8; CHALLENGE_ID_BYTES];
        OsRng.fill_bytes(&mut challenge);
        OsRng.fill_bytes(&mut challenge_id);

        let issued_at = Utc::now();
        Self {
            challenge: hex::encode(challenge),
            challenge_id: hex::encode(challenge_id),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// Whether the challenge has passed its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_shape() {
        let c = LoginChallenge::generate();
        assert_eq!(c.challenge.len(), CHALLENGE_BYTES * 2);
        assert_eq!(c.challenge_id.len(), CHALLENGE_ID_BYTES * 2);
        assert!(c.challenge.chars().all(|ch| ch.is_ascii_hexdigit()));
        assert!(c.challenge_id.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_challenges_are_unique() {
        let a = LoginChallenge::generate();
        let b = LoginChallenge::generate();
        assert_ne!(a.challenge, b.challenge);
        assert_ne!(a.challenge_id, b.challenge_id);
    }

    #[test]
    fn test_fresh_challenge_not_expired() {
        let c = LoginChallenge::generate();
        assert!(!c.is_expired());
        assert!(c.expires_at > c.issued_at);
    }

    #[test]
    fn test_zero_ttl_challenge_expires() {
        let c = LoginChallenge::generate_with_ttl(Duration::seconds(-1));
        assert!(c.is_expired());
    }
}

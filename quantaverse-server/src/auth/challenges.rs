//! In-memory storage for pending login challenges
//!
//! Challenges are temporary (5 minute expiry) and don't need database
//! persistence. Keeping them in memory also gives single-use semantics for
//! free: a challenge is removed on its first verification attempt, whether
//! or not the signature checks out.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

/// A challenge waiting for its signature.
pub struct PendingChallenge {
    /// The user the challenge was issued to.
    pub user_id: Uuid,
    /// The exact string the client must sign.
    pub challenge: String,
    pub expires_at: Instant,
}

/// In-memory store for pending login challenges, keyed by challenge id.
#[derive(Default)]
pub struct ChallengeStore {
    pending: DashMap<String, PendingChallenge>,
}

impl ChallengeStore {
    /// Create a new challenge store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a pending challenge under its id
    pub fn store(&self, challenge_id: String, user_id: Uuid, challenge: String, ttl_secs: u64) {
        self.pending.insert(
            challenge_id,
            PendingChallenge {
                user_id,
                challenge,
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
    }

    /// Retrieve and remove a pending challenge.
    ///
    /// Returns `None` for unknown ids and for entries past their expiry;
    /// either way the entry is gone afterwards.
    pub fn take(&self, challenge_id: &str) -> Option<PendingChallenge> {
        let (_, entry) = self.pending.remove(challenge_id)?;
        if entry.expires_at > Instant::now() {
            Some(entry)
        } else {
            None // Expired
        }
    }

    /// Remove expired challenges (called periodically)
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.pending.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of pending challenges
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl std::fmt::Debug for ChallengeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeStore")
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_take() {
        let store = ChallengeStore::new();
        let user_id = Uuid::new_v4();

        store.store("abc".to_string(), user_id, "deadbeef".to_string(), 300);
        assert_eq!(store.len(), 1);

        let entry = store.take("abc").expect("challenge should be present");
        assert_eq!(entry.user_id, user_id);
        assert_eq!(entry.challenge, "deadbeef");
        assert!(store.is_empty());
    }

    #[test]
    fn test_take_is_single_use() {
        let store = ChallengeStore::new();
        store.store("abc".to_string(), Uuid::new_v4(), "x".to_string(), 300);

        assert!(store.take("abc").is_some());
        assert!(store.take("abc").is_none());
    }

    #[test]
    fn test_take_unknown_id() {
        let store = ChallengeStore::new();
        assert!(store.take("missing").is_none());
    }

    #[test]
    fn test_expired_challenge_not_returned() {
        let store = ChallengeStore::new();
        store.store("abc".to_string(), Uuid::new_v4(), "x".to_string(), 0);

        assert!(store.take("abc").is_none());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = ChallengeStore::new();
        store.store("live".to_string(), Uuid::new_v4(), "x".to_string(), 300);
        store.store("dead".to_string(), Uuid::new_v4(), "y".to_string(), 0);

        store.cleanup_expired();
        assert_eq!(store.len(), 1);
        assert!(store.take("live").is_some());
    }
}

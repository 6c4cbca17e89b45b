//! Local keyfile handling.
//!
//! The keyfile holds both keypairs as JSON. Private keys are wrapped in
//! the core zeroizing type so they are wiped from memory on drop, and the
//! file itself is written with owner-only permissions on Unix.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use quantaverse_core::Keypair;

/// On-disk keyfile format.
#[derive(Serialize, Deserialize)]
pub struct Keyfile {
    /// Kyber-512 keypair (encryption)
    pub kyber: Keypair,
    /// Dilithium2 keypair (signatures; answers login challenges)
    pub dilithium: Keypair,
    /// When the keys were generated
    pub created_at: DateTime<Utc>,
}

impl Keyfile {
    pub fn new(kyber: Keypair, dilithium: Keypair) -> Self {
        Self {
            kyber,
            dilithium,
            created_at: Utc::now(),
        }
    }

    /// Load and parse a keyfile.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read keyfile: {}", path.display()))?;

        let keyfile: Keyfile = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse keyfile: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded keyfile");
        Ok(keyfile)
    }

    /// Write the keyfile with owner-only permissions.
    pub fn save(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "Keyfile already exists: {} (use --force to overwrite)",
                path.display()
            );
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize keyfile")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write keyfile: {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set keyfile permissions: {}", path.display()))?;
        }

        debug!(path = %path.display(), "Saved keyfile");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantaverse_core::SecretKeyMaterial;

    fn sample_keyfile() -> Keyfile {
        Keyfile::new(
            Keypair {
                public_key: "a3liZXItcHVibGlj".to_string(),
                private_key: SecretKeyMaterial::new("a3liZXItcHJpdmF0ZQ=="),
            },
            Keypair {
                public_key: "ZGlsaXRoaXVtLXB1YmxpYw==".to_string(),
                private_key: SecretKeyMaterial::new("ZGlsaXRoaXVtLXByaXZhdGU="),
            },
        )
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");

        let keyfile = sample_keyfile();
        keyfile.save(&path, false).unwrap();

        let loaded = Keyfile::load(&path).unwrap();
        assert_eq!(loaded.kyber.public_key, keyfile.kyber.public_key);
        assert_eq!(
            loaded.dilithium.private_key.expose(),
            keyfile.dilithium.private_key.expose()
        );
    }

    #[test]
    fn test_save_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");

        sample_keyfile().save(&path, false).unwrap();
        assert!(sample_keyfile().save(&path, false).is_err());
        assert!(sample_keyfile().save(&path, true).is_ok());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Keyfile::load(&dir.path().join("absent.json")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_keyfile_permissions_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        sample_keyfile().save(&path, false).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

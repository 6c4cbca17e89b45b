//! Login command implementation.
//!
//! Fetches a challenge from the server, signs it with the local Dilithium
//! private key via the PQC service, and exchanges the signature for a
//! session token.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{debug, info};

use quantaverse_core::{PqcBridge, PqcProvider};

use crate::api::ApiClient;
use crate::keyfile::Keyfile;

/// Execute the login command.
pub async fn execute(identifier: String, keyfile: PathBuf, api_url: String) -> Result<()> {
    let keys = Keyfile::load(&keyfile)?;
    let client = ApiClient::new(api_url)?;
    let pqc = PqcBridge::new().context("Failed to create PQC service client")?;

    info!(identifier = %identifier, "Requesting login challenge");
    let challenge = client.login_challenge(&identifier).await?;
    debug!(
        challenge_id = %challenge.challenge_id,
        expires_at = %challenge.expires_at,
        "Challenge received"
    );

    // The signature covers the challenge string exactly as received
    let signature = pqc
        .sign(&challenge.challenge, keys.dilithium.private_key.expose())
        .await
        .context("Failed to sign challenge with PQC service")?;

    let session = client
        .verify_challenge(challenge.user_id, &challenge.challenge_id, &signature)
        .await?;

    println!();
    println!("{}", "Login successful!".green().bold());
    println!();
    println!("   {} {}", "User:".dimmed(), session.user.username);
    println!("   {} {}", "Token:".dimmed(), session.token);
    println!();
    println!("Use the token as: Authorization: Bearer <token>");

    Ok(())
}

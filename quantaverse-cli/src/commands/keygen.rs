//! Keygen command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{debug, info};

use quantaverse_core::{PqcBridge, PqcProvider};

use crate::keyfile::Keyfile;

/// Execute the keygen command.
pub async fn execute(output: PathBuf, force: bool) -> Result<()> {
    let pqc = PqcBridge::new().context("Failed to create PQC service client")?;

    info!("Requesting keypairs from PQC service");
    let kyber = pqc
        .generate_kyber_keypair()
        .await
        .context("Failed to generate Kyber keypair")?;
    debug!(public_len = kyber.public_key.len(), "Kyber keypair received");

    let dilithium = pqc
        .generate_dilithium_keypair()
        .await
        .context("Failed to generate Dilithium keypair")?;
    debug!(
        public_len = dilithium.public_key.len(),
        "Dilithium keypair received"
    );

    let keyfile = Keyfile::new(kyber, dilithium);
    keyfile.save(&output, force)?;

    println!();
    println!("{}", "Post-quantum keypairs generated!".green().bold());
    println!();
    println!("   {} {}", "Keyfile:".dimmed(), output.display());
    println!(
        "   {} Kyber-512 (encryption) + Dilithium2 (signatures)",
        "Algorithms:".dimmed()
    );
    println!();
    println!(
        "{}",
        "Keep this file safe: the private keys inside are your only credential.".yellow()
    );

    Ok(())
}

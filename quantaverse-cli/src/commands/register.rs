//! Register command implementation.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use crate::api::ApiClient;
use crate::keyfile::Keyfile;

/// Execute the register command.
pub async fn execute(
    username: String,
    email: String,
    keyfile: PathBuf,
    api_url: String,
) -> Result<()> {
    let keys = Keyfile::load(&keyfile)?;
    let client = ApiClient::new(api_url)?;

    info!(username = %username, "Registering account");
    let response = client
        .register(
            &username,
            &email,
            &keys.kyber.public_key,
            &keys.dilithium.public_key,
        )
        .await?;

    println!();
    println!("{}", "Account registered!".green().bold());
    println!();
    println!("   {} {}", "User id:".dimmed(), response.user.id);
    println!("   {} {}", "Username:".dimmed(), response.user.username);
    println!("   {} {}", "Email:".dimmed(), response.user.email);
    println!();
    println!("Log in with: quantaverse login {username}");

    Ok(())
}

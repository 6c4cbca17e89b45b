//! Whoami command implementation.

use anyhow::Result;
use colored::Colorize;

use crate::api::ApiClient;

/// Execute the whoami command.
pub async fn execute(token: String, api_url: String) -> Result<()> {
    let client = ApiClient::new(api_url)?;
    let response = client.whoami(&token).await?;

    println!();
    println!("{}", response.user.username.green().bold());
    println!();
    println!("   {} {}", "User id:".dimmed(), response.user.id);
    println!("   {} {}", "Email:".dimmed(), response.user.email);
    println!(
        "   {} {}",
        "Member since:".dimmed(),
        response.user.created_at.format("%Y-%m-%d")
    );
    if let Some(last_login) = response.user.last_login_at {
        println!(
            "   {} {}",
            "Last login:".dimmed(),
            last_login.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}

//! QuantaVerse CLI - local key custody and challenge signing.
//!
//! Holds the user's Kyber/Dilithium private keys in a local keyfile and
//! drives the register/login flows against a QuantaVerse server. Private
//! keys never leave this machine except toward the local PQC signing
//! service.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

mod api;
mod commands;
mod exit_codes;
mod keyfile;

/// Default server API base URL.
const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser)]
#[command(name = "quantaverse")]
#[command(author, version, about = "Post-quantum social networking client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Kyber and Dilithium keypairs into a local keyfile
    Keygen {
        /// Path for the keyfile
        #[arg(short, long, default_value = "quantaverse-keys.json")]
        output: PathBuf,

        /// Overwrite an existing keyfile
        #[arg(long)]
        force: bool,
    },

    /// Register a new account using the keyfile's public keys
    Register {
        /// Desired username
        #[arg(value_name = "USERNAME")]
        username: String,

        /// Email address
        #[arg(value_name = "EMAIL")]
        email: String,

        /// Path to the keyfile
        #[arg(short, long, default_value = "quantaverse-keys.json")]
        keyfile: PathBuf,

        /// Server API base URL
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,
    },

    /// Log in by signing a server challenge with the local Dilithium key
    Login {
        /// Username or email
        #[arg(value_name = "IDENTIFIER")]
        identifier: String,

        /// Path to the keyfile
        #[arg(short, long, default_value = "quantaverse-keys.json")]
        keyfile: PathBuf,

        /// Server API base URL
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,
    },

    /// Show the profile behind a session token
    Whoami {
        /// Session token from a previous login
        #[arg(value_name = "TOKEN")]
        token: String,

        /// Server API base URL
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Keygen { output, force } => commands::keygen::execute(output, force).await,
        Commands::Register {
            username,
            email,
            keyfile,
            api_url,
        } => commands::register::execute(username, email, keyfile, api_url).await,
        Commands::Login {
            identifier,
            keyfile,
            api_url,
        } => commands::login::execute(identifier, keyfile, api_url).await,
        Commands::Whoami { token, api_url } => commands::whoami::execute(token, api_url).await,
    };

    if let Err(err) = result {
        let exit = exit_codes::ExitCode::from_anyhow(&err);
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(exit.code);
    }
}

//! QuantaVerse Server - REST API for post-quantum social networking
//!
//! Users authenticate with Kyber/Dilithium key pairs instead of passwords:
//! - POST /api/auth/register        - store public keys
//! - POST /api/auth/login-challenge - issue a challenge to sign
//! - POST /api/auth/verify-challenge - verify the signature, issue a token

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use quantaverse_core::{MockPqc, PqcBridge, PqcBridgeConfig, PqcProvider};
use quantaverse_server::auth::{ChallengeStore, JwtKeys};
use quantaverse_server::db::{self, CommentRepository, PostRepository, UserRepository};
use quantaverse_server::{create_router_with_config, AppState, Config};

/// How often expired challenges are swept from the in-memory store.
const CHALLENGE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.socket_addr(),
        "Starting QuantaVerse server"
    );

    // PQC provider: the bridge in production, mock only when explicitly allowed
    let pqc: Arc<dyn PqcProvider> = if config.allow_mock_pqc {
        tracing::warn!("ALLOW_MOCK_PQC is set - using mock PQC provider (NOT quantum-safe!)");
        Arc::new(MockPqc::default())
    } else {
        let bridge = PqcBridge::with_config(PqcBridgeConfig {
            base_url: config.pqc_service_url.clone(),
            ..Default::default()
        })?;
        if let Err(e) = bridge.check_health().await {
            tracing::warn!(error = %e, "PQC service health check failed at startup");
        }
        Arc::new(bridge)
    };

    // Database: optional, with graceful degradation when unset
    let (user_repo, post_repo, comment_repo) = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => {
            let pool = db::connect(
                &url,
                config.database_max_connections,
                config.database_min_connections,
            )
            .await?;
            (
                Some(Arc::new(UserRepository::new(pool.clone()))),
                Some(Arc::new(PostRepository::new(pool.clone()))),
                Some(Arc::new(CommentRepository::new(pool))),
            )
        }
        _ => {
            tracing::warn!("DATABASE_URL not set - data endpoints will answer 503");
            (None, None, None)
        }
    };

    let challenges = Arc::new(ChallengeStore::new());

    // Periodic sweep of expired login challenges
    let sweep_store = Arc::clone(&challenges);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHALLENGE_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweep_store.cleanup_expired();
        }
    });

    let state = AppState {
        user_repo,
        post_repo,
        comment_repo,
        challenges,
        pqc,
        jwt: Arc::new(JwtKeys::new(&config.jwt_secret, config.jwt_expiry_hours)),
        challenge_ttl_secs: config.challenge_ttl_secs,
    };

    let app = create_router_with_config(&config, state);

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    tracing::info!("Listening on http://{}", config.socket_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}

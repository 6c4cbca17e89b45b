//! Database module for QuantaVerse Server
//!
//! Contains entities, repositories, and database utilities.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentRecord, CommentRepository, CreateComment};
pub use post::{
    CreatePost, Post, PostListParams, PostListResponse, PostRecord, PostRepository, UpdatePost,
};
pub use user::{CreateUser, PublicUser, User, UserRepository, UserResponse};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Open a connection pool and run pending migrations.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect(database_url)
        .await?;

    tracing::info!("Connected to PostgreSQL database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}

/// Check database connection health.
pub async fn check_health(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

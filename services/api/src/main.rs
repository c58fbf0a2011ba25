use anyhow::Result;
use common::{
    database::{self, DatabaseConfig},
    token::TokenMaker,
};
use media::{ImageUploader, S3ObjectStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod posts;
mod repositories;
mod routes;
mod state;

use crate::{
    config::ApiConfig, posts::PostService, repositories::PostRepository, state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    let config = ApiConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let token_maker = TokenMaker::new(&config.token.secret)?;

    let object_store = S3ObjectStore::new(&config.s3).await;
    let post_service = PostService::new(
        Arc::new(PostRepository::new(pool.clone())),
        ImageUploader::new(Arc::new(object_store)),
    );

    let app_state = AppState::new(pool, token_maker, post_service);

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.server.address).await?;
    info!("API service listening on {}", config.server.address);

    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::Result;
use common::{
    database::{self, DatabaseConfig},
    token::TokenMaker,
};
use sqlx::PgPool;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod cookies;
mod error;
mod models;
mod repositories;
mod routes;
mod session;

use crate::{
    config::AuthConfig,
    repositories::{SessionRepository, UserRepository, UserStore},
    session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: Arc<dyn UserStore>,
    pub session_manager: SessionManager,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    let config = AuthConfig::from_env()?;

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
    let session_manager = SessionManager::new(
        Arc::new(SessionRepository::new(pool.clone())),
        token_maker,
        config.token.access_token_duration,
        config.token.refresh_token_duration,
    );

    let app_state = AppState {
        db_pool: pool.clone(),
        user_repository: Arc::new(UserRepository::new(pool)),
        session_manager,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.server.address).await?;
    info!("Authentication service listening on {}", config.server.address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

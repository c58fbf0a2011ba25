use anyhow::Result;
use common::token::TokenConfig;
use media::S3Config;
use std::{env, net::SocketAddr};

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_ADDRESS`: Listen address (default: "0.0.0.0:3001")
    pub fn from_env() -> Result<Self> {
        let address = env::var("SERVER_ADDRESS")
            .unwrap_or_else(|_| "0.0.0.0:3001".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid SERVER_ADDRESS: {}", e))?;

        Ok(Self { address })
    }
}

/// Everything the API service reads at startup
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub token: TokenConfig,
    pub s3: S3Config,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            token: TokenConfig::from_env()?,
            s3: S3Config::from_env(),
        })
    }
}

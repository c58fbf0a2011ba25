use anyhow::Result;
use common::token::TokenConfig;
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
    /// - `SERVER_ADDRESS`: Listen address (default: "0.0.0.0:3000")
    pub fn from_env() -> Result<Self> {
        let address = env::var("SERVER_ADDRESS")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid SERVER_ADDRESS: {}", e))?;

        Ok(Self { address })
    }
}

/// Everything the auth service reads at startup
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub server: ServerConfig,
    pub token: TokenConfig,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            token: TokenConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_default_address() {
        unsafe {
            env::remove_var("SERVER_ADDRESS");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.address, "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    #[serial]
    fn test_server_config_rejects_garbage() {
        unsafe {
            env::set_var("SERVER_ADDRESS", "not-an-address");
        }

        assert!(ServerConfig::from_env().is_err());

        unsafe {
            env::remove_var("SERVER_ADDRESS");
        }
    }

    #[test]
    #[serial]
    fn test_auth_config_requires_token_secret() {
        unsafe {
            env::remove_var("TOKEN_SECRET");
        }

        assert!(AuthConfig::from_env().is_err());
    }
}

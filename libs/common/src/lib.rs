//! Common library for the social backend
//!
//! This crate provides shared functionality used across the services:
//! database connectivity, the storage error taxonomy, password hashing and
//! the encrypted authentication token maker.

pub mod database;
pub mod error;
pub mod password;
pub mod token;

/// Example usage of the token module
///
/// ```rust,no_run
/// use common::token::{TokenConfig, TokenMaker};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = TokenConfig::from_env()?;
///     let maker = TokenMaker::new(&config.secret)?;
///     let (token, payload) = maker.create_token(uuid::Uuid::new_v4(), config.access_token_duration)?;
///     let verified = maker.verify_token(&token)?;
///     assert_eq!(verified.id, payload.id);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}

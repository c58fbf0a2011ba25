//! Integration tests for the token and password components
//!
//! These tests exercise the public API the services rely on: issuing an
//! access/refresh pair, verifying each, and rejecting foreign tokens.

use chrono::Duration;
use common::{
    password::{hash_password, verify_password},
    token::{TokenError, TokenMaker, bearer_token},
};
use std::collections::HashSet;
use uuid::Uuid;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

/// An access/refresh pair issued for one user verifies independently
#[test]
fn test_access_and_refresh_pair() -> Result<(), Box<dyn std::error::Error>> {
    let maker = TokenMaker::new(SECRET)?;
    let user_id = Uuid::new_v4();

    let (access, access_payload) = maker.create_token(user_id, Duration::minutes(15))?;
    let (refresh, refresh_payload) = maker.create_token(user_id, Duration::days(7))?;

    assert_ne!(access_payload.id, refresh_payload.id);
    assert!(refresh_payload.expired_at > access_payload.expired_at);

    let header = format!("Bearer {}", access);
    let extracted = bearer_token(&header).expect("bearer header");
    assert_eq!(maker.verify_token(extracted)?.user_id, user_id);
    assert_eq!(maker.verify_token(&refresh)?.id, refresh_payload.id);

    Ok(())
}

/// Payload ids never repeat across many issuances
#[test]
fn test_payload_ids_are_unique() -> Result<(), Box<dyn std::error::Error>> {
    let maker = TokenMaker::new(SECRET)?;
    let user_id = Uuid::new_v4();

    let mut ids = HashSet::new();
    let mut tokens = HashSet::new();
    for _ in 0..100 {
        let (token, payload) = maker.create_token(user_id, Duration::minutes(1))?;
        assert!(ids.insert(payload.id), "duplicate payload id");
        assert!(tokens.insert(token), "duplicate token string");
    }

    Ok(())
}

/// A maker built from a different secret cannot read the token
#[test]
fn test_tokens_are_bound_to_their_key() -> Result<(), Box<dyn std::error::Error>> {
    let issuer = TokenMaker::new(SECRET)?;
    let other = TokenMaker::new("fedcba9876543210fedcba9876543210")?;

    let (token, _) = issuer.create_token(Uuid::new_v4(), Duration::minutes(1))?;
    assert_eq!(other.verify_token(&token), Err(TokenError::InvalidToken));

    Ok(())
}

/// Stored password hashes verify the original password only
#[test]
fn test_password_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let hash = hash_password("hunter22")?;
    assert!(verify_password("hunter22", &hash)?);
    assert!(!verify_password("hunter23", &hash)?);
    Ok(())
}

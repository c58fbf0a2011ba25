//! Encrypted authentication tokens
//!
//! Tokens are AES-256-GCM sealed payloads: holders cannot read the user id
//! or validity window, and any modification fails authentication. The wire
//! format is `v1.local.` followed by base64url(`nonce || ciphertext || tag`),
//! with the version header bound as associated data.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload as Sealed},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Version header prefixed to every token
const TOKEN_HEADER: &str = "v1.local.";
/// Required secret length in bytes
pub const KEY_SIZE: usize = 32;
/// AES-GCM nonce length in bytes
const NONCE_SIZE: usize = 12;
/// AES-GCM tag length in bytes
const TAG_SIZE: usize = 16;

/// Token failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be decoded, decrypted or authenticated
    #[error("token is invalid")]
    InvalidToken,

    /// The token authenticated but its validity window has passed
    #[error("token has expired")]
    ExpiredToken,

    /// The configured secret is not usable as an AES-256 key
    #[error("invalid key size: must be exactly {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    /// Sealing the payload failed
    #[error("failed to create token: {0}")]
    Creation(String),
}

/// Decoded token contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Unique token identifier
    pub id: Uuid,
    /// Subject identity
    pub user_id: Uuid,
    /// Issue time
    pub issued_at: DateTime<Utc>,
    /// Expiry time
    pub expired_at: DateTime<Utc>,
}

impl Payload {
    /// Build a payload for `user_id` valid for `duration` from now
    pub fn new(user_id: Uuid, duration: Duration) -> Result<Self, TokenError> {
        let issued_at = Utc::now();
        let expired_at = issued_at.checked_add_signed(duration).ok_or_else(|| {
            TokenError::Creation(format!("token duration {} is out of range", duration))
        })?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            issued_at,
            expired_at,
        })
    }

    /// Whether the validity window has passed at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expired_at
    }
}

/// Issues and verifies tokens under one symmetric key
#[derive(Clone)]
pub struct TokenMaker {
    cipher: Aes256Gcm,
}

impl TokenMaker {
    /// Create a maker from a 32-byte secret
    ///
    /// Fails here rather than at verification time if the secret has the
    /// wrong length.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        let key = secret.as_bytes();
        if key.len() != KEY_SIZE {
            return Err(TokenError::InvalidKeySize {
                expected: KEY_SIZE,
                actual: key.len(),
            });
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| TokenError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        })?;

        Ok(Self { cipher })
    }

    /// Issue a token for `user_id` valid for `duration`
    ///
    /// Negative durations are accepted and yield tokens that are already
    /// expired; durations whose expiry cannot be represented fail with
    /// `TokenError::Creation`. The plaintext payload is returned alongside the token so
    /// callers can persist session metadata without decrypting again.
    pub fn create_token(
        &self,
        user_id: Uuid,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(user_id, duration)?;
        let plaintext =
            serde_json::to_vec(&payload).map_err(|e| TokenError::Creation(e.to_string()))?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Sealed {
                    msg: &plaintext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|e| TokenError::Creation(e.to_string()))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);

        let token = format!("{}{}", TOKEN_HEADER, URL_SAFE_NO_PAD.encode(&combined));
        Ok((token, payload))
    }

    /// Verify a token and return its payload
    ///
    /// Integrity is checked before expiry; a tampered token is always
    /// `InvalidToken`, never `ExpiredToken`.
    pub fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        let payload = self.open(token)?;

        if payload.is_expired_at(Utc::now()) {
            return Err(TokenError::ExpiredToken);
        }

        Ok(payload)
    }

    fn open(&self, token: &str) -> Result<Payload, TokenError> {
        let body = token
            .strip_prefix(TOKEN_HEADER)
            .ok_or(TokenError::InvalidToken)?;

        let combined = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|_| TokenError::InvalidToken)?;

        if combined.len() < NONCE_SIZE + TAG_SIZE {
            return Err(TokenError::InvalidToken);
        }

        let (nonce, ciphertext) = combined.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Sealed {
                    msg: ciphertext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::InvalidToken)?;

        serde_json::from_slice(&plaintext).map_err(|_| TokenError::InvalidToken)
    }
}

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Symmetric secret, exactly 32 bytes
    pub secret: String,
    /// Access token lifetime (default: 15 minutes)
    pub access_token_duration: Duration,
    /// Refresh token lifetime (default: 7 days)
    pub refresh_token_duration: Duration,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `TOKEN_SECRET`: 32-byte symmetric key
    /// - `ACCESS_TOKEN_DURATION`: Access token lifetime in seconds (default: 900)
    /// - `REFRESH_TOKEN_DURATION`: Refresh token lifetime in seconds (default: 604800)
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("TOKEN_SECRET environment variable not set"))?;

        Ok(TokenConfig {
            secret,
            access_token_duration: duration_from_env("ACCESS_TOKEN_DURATION", 900)?,
            refresh_token_duration: duration_from_env("REFRESH_TOKEN_DURATION", 604800)?,
        })
    }
}

/// Read a positive number of seconds from `var`, falling back to `default`
fn duration_from_env(var: &str, default: i64) -> anyhow::Result<Duration> {
    let seconds = match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("Invalid {} {:?}: {}", var, value, e))?,
        Err(_) => default,
    };

    if seconds <= 0 {
        anyhow::bail!("{} must be a positive number of seconds, got {}", var, seconds);
    }

    Duration::try_seconds(seconds)
        .ok_or_else(|| anyhow::anyhow!("{} of {} seconds is out of range", var, seconds))
}

/// Extract the token from an `Authorization` header value
///
/// Accepts exactly two whitespace-separated fields with a case-insensitive
/// `Bearer` scheme.
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut fields = header.split_whitespace();
    let scheme = fields.next()?;
    let token = fields.next()?;

    if fields.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SECRET: &str = "dadsdfdsfsdfdsfsdfsdfsdffrkjmbdx";

    fn maker() -> TokenMaker {
        TokenMaker::new(SECRET).expect("32-byte secret")
    }

    #[test]
    fn create_and_verify() {
        let maker = maker();
        let user_id = Uuid::new_v4();
        let issued_at = Utc::now();

        let (token, created) = maker.create_token(user_id, Duration::minutes(1)).unwrap();
        assert!(token.starts_with(TOKEN_HEADER));

        let payload = maker.verify_token(&token).unwrap();
        assert_eq!(payload, created);
        assert_eq!(payload.user_id, user_id);
        assert!((payload.issued_at - issued_at).num_seconds().abs() <= 1);
        assert!(
            (payload.expired_at - (issued_at + Duration::minutes(1)))
                .num_seconds()
                .abs()
                <= 1
        );
        assert!(payload.expired_at > payload.issued_at);
    }

    #[test]
    fn negative_duration_creates_expired_token() {
        let maker = maker();
        let (token, _) = maker
            .create_token(Uuid::new_v4(), -Duration::minutes(1))
            .unwrap();
        assert!(!token.is_empty());

        assert_eq!(maker.verify_token(&token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn unrepresentable_expiry_is_a_creation_error() {
        let result = maker().create_token(Uuid::new_v4(), Duration::days(100_000_000));
        assert!(matches!(result, Err(TokenError::Creation(_))));

        assert!(matches!(
            Payload::new(Uuid::new_v4(), Duration::MAX),
            Err(TokenError::Creation(_))
        ));
    }

    #[test]
    fn tokens_for_same_user_differ() {
        let maker = maker();
        let user_id = Uuid::new_v4();
        let (first, p1) = maker.create_token(user_id, Duration::minutes(5)).unwrap();
        let (second, p2) = maker.create_token(user_id, Duration::minutes(5)).unwrap();

        assert_ne!(first, second);
        assert_ne!(p1.id, p2.id);
    }

    #[test]
    fn tampered_token_is_invalid_even_if_expired() {
        let maker = maker();
        let (token, _) = maker
            .create_token(Uuid::new_v4(), -Duration::minutes(1))
            .unwrap();

        let mut bytes = token.into_bytes();
        let idx = TOKEN_HEADER.len() + 10;
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(maker.verify_token(&tampered), Err(TokenError::InvalidToken));
    }

    #[test]
    fn wrong_key_is_invalid() {
        let (token, _) = maker()
            .create_token(Uuid::new_v4(), Duration::minutes(1))
            .unwrap();
        let other = TokenMaker::new("ffffffffffffffffffffffffffffffff").unwrap();

        assert_eq!(other.verify_token(&token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn garbage_is_invalid() {
        let maker = maker();
        for token in ["", "v1.local.", "v1.local.!!!", "v2.local.AAAA", "not a token"] {
            assert_eq!(maker.verify_token(token), Err(TokenError::InvalidToken));
        }
    }

    #[test]
    fn key_size_checked_at_construction() {
        assert!(matches!(
            TokenMaker::new("short"),
            Err(TokenError::InvalidKeySize {
                expected: 32,
                actual: 5
            })
        ));
        assert!(TokenMaker::new(&"k".repeat(33)).is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer a b"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    #[serial]
    fn token_config_from_env() {
        unsafe {
            std::env::set_var("TOKEN_SECRET", SECRET);
            std::env::remove_var("ACCESS_TOKEN_DURATION");
            std::env::set_var("REFRESH_TOKEN_DURATION", "3600");
        }

        let config = TokenConfig::from_env().unwrap();
        assert_eq!(config.secret, SECRET);
        assert_eq!(config.access_token_duration, Duration::seconds(900));
        assert_eq!(config.refresh_token_duration, Duration::hours(1));

        unsafe {
            std::env::remove_var("TOKEN_SECRET");
            std::env::remove_var("REFRESH_TOKEN_DURATION");
        }
        assert!(TokenConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn token_config_rejects_bad_durations() {
        unsafe {
            std::env::set_var("TOKEN_SECRET", SECRET);
            std::env::remove_var("ACCESS_TOKEN_DURATION");
        }

        for value in ["9223372036854775807", "-60", "0", "seven days"] {
            unsafe {
                std::env::set_var("REFRESH_TOKEN_DURATION", value);
            }
            assert!(TokenConfig::from_env().is_err(), "{}", value);
        }

        unsafe {
            std::env::set_var("REFRESH_TOKEN_DURATION", " 60 ");
        }
        let config = TokenConfig::from_env().unwrap();
        assert_eq!(config.refresh_token_duration, Duration::minutes(1));

        unsafe {
            std::env::remove_var("TOKEN_SECRET");
            std::env::remove_var("REFRESH_TOKEN_DURATION");
        }
    }
}

//! Error type for the authentication service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{error::StoreError, token::TokenError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::session::SessionError;

/// Custom error type for the authentication service
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Token(#[from] TokenError),

    #[error("refresh token cookie is missing")]
    MissingRefreshToken,

    #[error("session not found")]
    SessionNotFound,

    #[error("session is blocked")]
    SessionBlocked,

    #[error("session does not belong to this user")]
    SessionUserMismatch,

    #[error("user not found")]
    UserNotFound,

    #[error("incorrect password")]
    InvalidCredentials,

    #[error("username already exists")]
    UsernameTaken,

    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Token(TokenError::InvalidToken | TokenError::ExpiredToken)
            | AuthError::MissingRefreshToken
            | AuthError::SessionNotFound
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Token(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::SessionBlocked | AuthError::SessionUserMismatch => StatusCode::FORBIDDEN,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::UsernameTaken => StatusCode::CONFLICT,
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Token(e) => AuthError::Token(e),
            SessionError::SessionNotFound => AuthError::SessionNotFound,
            SessionError::SessionBlocked => AuthError::SessionBlocked,
            SessionError::SessionUserMismatch => AuthError::SessionUserMismatch,
            SessionError::Store(e) => AuthError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:?}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Map a user lookup failure
pub fn user_lookup_error(err: StoreError) -> AuthError {
    match err {
        StoreError::NotFound => AuthError::UserNotFound,
        other => AuthError::Internal(other.into()),
    }
}

/// Type alias for auth handler results
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_map_to_http_status() {
        let cases = [
            (SessionError::SessionNotFound, StatusCode::UNAUTHORIZED),
            (SessionError::SessionBlocked, StatusCode::FORBIDDEN),
            (SessionError::SessionUserMismatch, StatusCode::FORBIDDEN),
            (
                SessionError::Token(TokenError::ExpiredToken),
                StatusCode::UNAUTHORIZED,
            ),
            (
                SessionError::Token(TokenError::InvalidToken),
                StatusCode::UNAUTHORIZED,
            ),
            (
                SessionError::Store(StoreError::Other(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AuthError::from(err).status(), status);
        }
    }

    #[test]
    fn missing_user_is_not_found() {
        assert_eq!(
            user_lookup_error(StoreError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            user_lookup_error(StoreError::Other(sqlx::Error::PoolClosed)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{error::StoreError, token::TokenError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::posts::PostError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No usable bearer token on a protected route
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Token(#[from] TokenError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Internal server error; the cause is logged, never returned
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_)
            | ApiError::Token(TokenError::InvalidToken | TokenError::ExpiredToken) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Token(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl IntoResponse for ApiError {
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

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(detail) => ApiError::Conflict(detail),
            StoreError::ForeignKeyViolation(detail) => ApiError::BadRequest(detail),
            StoreError::NotFound => ApiError::NotFound("record not found".to_string()),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::TooManyImages { .. } => ApiError::BadRequest(err.to_string()),
            PostError::UnsupportedMediaType(_) => ApiError::UnsupportedMediaType(err.to_string()),
            PostError::NotFound => ApiError::NotFound(err.to_string()),
            PostError::Forbidden => ApiError::Forbidden(err.to_string()),
            PostError::Store(store) => store.into(),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

//! Authentication middleware for access token validation

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use common::token::bearer_token;
use tracing::debug;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Authentication middleware
///
/// Verifies the bearer access token and makes the caller available to
/// handlers as an `AuthUser` extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("authorization header is not provided".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("invalid authorization header format".to_string()))?;

    let token = bearer_token(auth_header)
        .ok_or_else(|| ApiError::Unauthorized("invalid authorization header format".to_string()))?;

    let payload = state.token_maker.verify_token(token).inspect_err(|e| {
        debug!("Rejected access token: {}", e);
    })?;

    req.extensions_mut().insert(AuthUser {
        id: payload.user_id,
    });

    Ok(next.run(req).await)
}

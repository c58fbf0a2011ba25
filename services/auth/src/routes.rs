//! Authentication service routes

use axum::{
    Json, Router,
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use common::{database, error::StoreError, password};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    cookies::{REFRESH_COOKIE, refresh_cookie},
    error::{AuthError, AuthResult, user_lookup_error},
    models::{CreateUserRequest, LoginRequest, NewUser, UserResponse},
};

/// Response for login and token refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(create_user))
        .route("/users/login", post(login_user))
        .route("/tokens/refresh", post(refresh_access_token))
        .with_state(state)
}

/// Health check endpoint
///
/// Answers 503 while the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_ok = database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if database_ok { "ok" } else { "degraded" },
            "service": "auth-service",
            "database": database_ok
        })),
    )
}

/// User registration endpoint
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AuthResult<impl IntoResponse> {
    let password_hash = password::hash_password_async(payload.password)
        .await
        .map_err(AuthError::Internal)?;

    let user = state
        .user_repository
        .create(&NewUser {
            id: Uuid::new_v4(),
            username: payload.username,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateKey(_) => AuthError::UsernameTaken,
            other => AuthError::Internal(other.into()),
        })?;

    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// User login endpoint
///
/// Returns the access token in the body and the refresh token as a cookie.
pub async fn login_user(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.username);

    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await
        .map_err(user_lookup_error)?;

    if !password::verify_password_async(payload.password, user.password_hash.clone())
        .await
        .map_err(AuthError::Internal)?
    {
        return Err(AuthError::InvalidCredentials);
    }

    let client_ip = connect_info.map(|ConnectInfo(addr)| addr.ip().to_string());
    let issued = state.session_manager.start_session(user.id, client_ip).await?;

    let jar = jar.add(refresh_cookie(
        &issued.refresh_token,
        state.session_manager.refresh_token_duration(),
    ));

    let response = AccessTokenResponse {
        access_token: issued.access_token,
        access_token_expires_at: issued.access_payload.expired_at,
        user: UserResponse::from(&user),
    };

    Ok((jar, Json(response)))
}

/// Refresh token endpoint
///
/// Reads the refresh token from its cookie and answers with a new access
/// token. The cookie itself is left untouched.
pub async fn refresh_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AuthResult<Json<AccessTokenResponse>> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AuthError::MissingRefreshToken)?;

    let refreshed = state
        .session_manager
        .refresh_access_token(&refresh_token)
        .await?;

    let user = state
        .user_repository
        .find_by_id(refreshed.access_payload.user_id)
        .await
        .map_err(user_lookup_error)?;

    Ok(Json(AccessTokenResponse {
        access_token: refreshed.access_token,
        access_token_expires_at: refreshed.access_payload.expired_at,
        user: UserResponse::from(&user),
    }))
}

//! User and follow handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::{error::StoreError, password};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        ListQuery, UserSearchQuery,
        user::{CountResponse, UpdatePasswordRequest, UpdateUsernameRequest, UserResponse},
    },
    state::AppState,
};

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("user not found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(user))
}

/// Search users by username prefix
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_repository
        .search_by_username(&query.input, query.page())
        .await?;

    Ok(Json(users))
}

/// Change the caller's username
pub async fn update_username(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateUsernameRequest>,
) -> ApiResult<Json<UserResponse>> {
    let updated = state
        .user_repository
        .update_username(user.id, &payload.username)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateKey(_) => {
                ApiError::Conflict("username already exists".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(updated))
}

/// Change the caller's password
pub async fn update_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<UserResponse>> {
    let password_hash = password::hash_password_async(payload.password)
        .await
        .map_err(ApiError::Internal)?;

    let updated = state
        .user_repository
        .update_password_hash(user.id, &password_hash)
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Follow another user
pub async fn follow_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(followed_user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let follow = state
        .follow_repository
        .follow(user.id, followed_user_id)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateKey(_) => {
                ApiError::Conflict("already following this user".to_string())
            }
            StoreError::ForeignKeyViolation(_) => {
                ApiError::BadRequest("user does not exist".to_string())
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(follow)))
}

/// Stop following a user
pub async fn unfollow_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(followed_user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .follow_repository
        .unfollow(user.id, followed_user_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("not following this user".to_string()),
            other => other.into(),
        })?;

    Ok(StatusCode::OK)
}

/// Users following `user_id`
pub async fn get_followers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .follow_repository
        .followers(query.id, query.page())
        .await?;

    Ok(Json(users))
}

/// Users `user_id` follows
pub async fn get_following(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .follow_repository
        .following(query.id, query.page())
        .await?;

    Ok(Json(users))
}

pub async fn count_followers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CountResponse>> {
    let count = state.follow_repository.count_followers(id).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn count_following(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CountResponse>> {
    let count = state.follow_repository.count_following(id).await?;
    Ok(Json(CountResponse { count }))
}

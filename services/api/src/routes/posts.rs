//! Post handlers

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::error::StoreError;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        ListQuery,
        post::{CreatePostResponse, PostResponse},
    },
    posts::Attachment,
    state::AppState,
};

const IMAGE_FIELD: &str = "image_content[]";
const TEXT_FIELD: &str = "text_content";

/// Create a post from a multipart form
///
/// Expects a `text_content` field and up to five `image_content[]` files.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut text_content = None;
    let mut attachments = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                attachments.push(Attachment { content_type, data });
            }
            Some(TEXT_FIELD) => {
                text_content = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.body_text()))?,
                );
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let text_content = text_content
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", TEXT_FIELD)))?;

    let created = state
        .post_service
        .create_post(user.id, text_content, attachments)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            post: created.post,
            number_of_errors: created.number_of_errors,
        }),
    ))
}

/// Delete one of the caller's posts
///
/// Images are removed in the background; their outcome does not affect the
/// response.
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    // Dropping the handle detaches the cleanup task.
    let _cleanup = state.post_service.delete_post(user.id, id).await?;

    Ok(StatusCode::OK)
}

/// Get a post with its author
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PostResponse>> {
    let post = state
        .post_repository
        .find_with_author(id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("post not found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(post))
}

/// Posts by a user, newest first
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let posts = state
        .post_repository
        .list_by_user(query.id, query.page())
        .await?;

    Ok(Json(posts))
}

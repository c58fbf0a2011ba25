//! Comment and reply handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::error::StoreError;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        ListQuery,
        social::{CommentResponse, CreateCommentRequest, CreateReplyRequest, ReplyResponse},
    },
    state::AppState,
};

/// Comment on a post
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    let comment = state
        .comment_repository
        .create_comment(user.id, payload.post_id, &payload.content)
        .await
        .map_err(|e| match e {
            StoreError::ForeignKeyViolation(_) => {
                ApiError::BadRequest("post does not exist".to_string())
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete one of the caller's comments
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let comment = state
        .comment_repository
        .get_comment(id)
        .await
        .map_err(|e| not_found(e, "comment not found"))?;

    if comment.user_id != user.id {
        return Err(ApiError::Forbidden(
            "comment belongs to another user".to_string(),
        ));
    }

    state
        .comment_repository
        .delete_comment(id)
        .await
        .map_err(|e| not_found(e, "comment not found"))?;

    Ok(StatusCode::OK)
}

/// Comments on a post
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let comments = state
        .comment_repository
        .list_by_post(query.id, query.page())
        .await?;

    Ok(Json(comments))
}

/// Reply to a comment
pub async fn create_reply(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateReplyRequest>,
) -> ApiResult<impl IntoResponse> {
    let reply = state
        .comment_repository
        .create_reply(user.id, payload.comment_id, &payload.content)
        .await
        .map_err(|e| match e {
            StoreError::ForeignKeyViolation(_) => {
                ApiError::BadRequest("comment does not exist".to_string())
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(reply)))
}

/// Delete one of the caller's replies
pub async fn delete_reply(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let reply = state
        .comment_repository
        .get_reply(id)
        .await
        .map_err(|e| not_found(e, "reply not found"))?;

    if reply.user_id != user.id {
        return Err(ApiError::Forbidden(
            "reply belongs to another user".to_string(),
        ));
    }

    state
        .comment_repository
        .delete_reply(id)
        .await
        .map_err(|e| not_found(e, "reply not found"))?;

    Ok(StatusCode::OK)
}

/// Replies to a comment
pub async fn list_replies(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ReplyResponse>>> {
    let replies = state
        .comment_repository
        .list_by_comment(query.id, query.page())
        .await?;

    Ok(Json(replies))
}

fn not_found(err: StoreError, message: &str) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::NotFound(message.to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        posts::tests::service,
        routes::tests::{app, bearer},
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn comment_requires_authentication() {
        let response = app(service(Arc::default(), Arc::default()))
            .oneshot(
                Request::post("/posts/comments")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(format!(
                        r#"{{"post_id":"{}","content":"nice"}}"#,
                        Uuid::new_v4()
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn reply_body_must_name_a_comment() {
        let response = app(service(Arc::default(), Arc::default()))
            .oneshot(
                Request::post("/posts/comments/replies")
                    .header(header::AUTHORIZATION, bearer(Uuid::new_v4()))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"content":"orphan"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

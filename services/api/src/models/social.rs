//! Follows, comments and replies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserResponse;

/// `user_id` follows `followed_user_id`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Follow {
    pub user_id: Uuid,
    pub followed_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Reply entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reply {
    pub id: Uuid,
    pub content: String,
    pub user_id: Uuid,
    pub comment_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request for commenting on a post
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub content: String,
}

/// Request for replying to a comment
#[derive(Debug, Deserialize)]
pub struct CreateReplyRequest {
    pub comment_id: Uuid,
    pub content: String,
}

/// Comment joined with its author and reply count
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub user_created_at: DateTime<Utc>,
    pub number_of_replies: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub user: UserResponse,
    pub number_of_replies: i64,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentResponse {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            user: UserResponse {
                id: row.user_id,
                username: row.username,
                created_at: row.user_created_at,
            },
            number_of_replies: row.number_of_replies,
            created_at: row.created_at,
        }
    }
}

/// Reply joined with its author
#[derive(Debug, Clone, FromRow)]
pub struct ReplyRow {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub user_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub id: Uuid,
    pub content: String,
    pub user: UserResponse,
    pub created_at: DateTime<Utc>,
}

impl From<ReplyRow> for ReplyResponse {
    fn from(row: ReplyRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            user: UserResponse {
                id: row.user_id,
                username: row.username,
                created_at: row.user_created_at,
            },
            created_at: row.created_at,
        }
    }
}

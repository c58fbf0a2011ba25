//! Post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserResponse;

/// Post entity
///
/// `image_count` is the number of images submitted with the post, including
/// any that failed to upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub text_content: String,
    pub image_count: i32,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// New post creation payload
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: Uuid,
    pub text_content: String,
    pub image_count: i32,
    pub user_id: Uuid,
}

/// Post joined with its author
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub text_content: String,
    pub image_count: i32,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub user_created_at: DateTime<Utc>,
}

/// Post as returned by the read endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub text_content: String,
    pub image_count: i32,
    pub user: UserResponse,
    pub created_at: DateTime<Utc>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            text_content: row.text_content,
            image_count: row.image_count,
            user: UserResponse {
                id: row.user_id,
                username: row.username,
                created_at: row.user_created_at,
            },
            created_at: row.created_at,
        }
    }
}

/// Response for post creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub post: Post,
    /// Images that could not be stored
    pub number_of_errors: usize,
}

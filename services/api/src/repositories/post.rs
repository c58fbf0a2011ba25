//! Post repository for database operations

use async_trait::async_trait;
use common::error::{StoreError, StoreResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{
        Page,
        post::{NewPost, Post, PostResponse, PostRow},
    },
    posts::PostStore,
};

const POST_WITH_AUTHOR: &str = r#"
    SELECT posts.id, posts.text_content, posts.image_count, posts.created_at,
           users.id AS user_id, users.username, users.created_at AS user_created_at
    FROM posts
    INNER JOIN users ON posts.user_id = users.id
"#;

/// PostgreSQL-backed post store
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A post with its author
    pub async fn find_with_author(&self, id: Uuid) -> StoreResult<PostResponse> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "{} WHERE posts.id = $1 LIMIT 1",
            POST_WITH_AUTHOR
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Posts by `user_id`, newest first
    pub async fn list_by_user(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<PostResponse>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{} WHERE posts.user_id = $1 ORDER BY posts.created_at DESC LIMIT $2 OFFSET $3",
            POST_WITH_AUTHOR
        ))
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostResponse::from).collect())
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create_post(&self, new_post: &NewPost) -> StoreResult<Post> {
        info!("Creating post {} for user {}", new_post.id, new_post.user_id);

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, text_content, image_count, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text_content, image_count, user_id, created_at
            "#,
        )
        .bind(new_post.id)
        .bind(&new_post.text_content)
        .bind(new_post.image_count)
        .bind(new_post.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn get_post_by_id(&self, id: Uuid) -> StoreResult<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, text_content, image_count, user_id, created_at
            FROM posts
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

//! Comment and reply repository for database operations

use common::error::{StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    Page,
    social::{Comment, CommentResponse, CommentRow, Reply, ReplyResponse, ReplyRow},
};

#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comment on a post; an unknown post is `ForeignKeyViolation`
    pub async fn create_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: &str,
    ) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, content, user_id, post_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, content, user_id, post_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(content)
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn get_comment(&self, id: Uuid) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, user_id, post_id, created_at
            FROM comments
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn delete_comment(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Comments on a post with author and reply count, newest first
    pub async fn list_by_post(
        &self,
        post_id: Uuid,
        page: Page,
    ) -> StoreResult<Vec<CommentResponse>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comments.id, comments.content, comments.created_at,
                   users.id AS user_id, users.username, users.created_at AS user_created_at,
                   (SELECT COUNT(*) FROM replies WHERE replies.comment_id = comments.id)
                       AS number_of_replies
            FROM comments
            INNER JOIN users ON comments.user_id = users.id
            WHERE comments.post_id = $1
            ORDER BY comments.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentResponse::from).collect())
    }

    /// Reply to a comment; an unknown comment is `ForeignKeyViolation`
    pub async fn create_reply(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        content: &str,
    ) -> StoreResult<Reply> {
        let reply = sqlx::query_as::<_, Reply>(
            r#"
            INSERT INTO replies (id, content, user_id, comment_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, content, user_id, comment_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(content)
        .bind(user_id)
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(reply)
    }

    pub async fn get_reply(&self, id: Uuid) -> StoreResult<Reply> {
        let reply = sqlx::query_as::<_, Reply>(
            r#"
            SELECT id, content, user_id, comment_id, created_at
            FROM replies
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(reply)
    }

    pub async fn delete_reply(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM replies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Replies to a comment with author, oldest first
    pub async fn list_by_comment(
        &self,
        comment_id: Uuid,
        page: Page,
    ) -> StoreResult<Vec<ReplyResponse>> {
        let rows = sqlx::query_as::<_, ReplyRow>(
            r#"
            SELECT replies.id, replies.content, replies.created_at,
                   users.id AS user_id, users.username, users.created_at AS user_created_at
            FROM replies
            INNER JOIN users ON replies.user_id = users.id
            WHERE replies.comment_id = $1
            ORDER BY replies.created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(comment_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReplyResponse::from).collect())
    }
}

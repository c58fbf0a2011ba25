//! Follow repository for database operations

use common::error::{StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Page, social::Follow, user::UserResponse};

#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record that `user_id` follows `followed_user_id`
    ///
    /// Following twice is `DuplicateKey`; an unknown user is
    /// `ForeignKeyViolation`.
    pub async fn follow(&self, user_id: Uuid, followed_user_id: Uuid) -> StoreResult<Follow> {
        let follow = sqlx::query_as::<_, Follow>(
            r#"
            INSERT INTO follows (user_id, followed_user_id)
            VALUES ($1, $2)
            RETURNING user_id, followed_user_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(followed_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(follow)
    }

    /// Remove a follow; `NotFound` when there was none
    pub async fn unfollow(&self, user_id: Uuid, followed_user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE user_id = $1 AND followed_user_id = $2
            "#,
        )
        .bind(user_id)
        .bind(followed_user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Users following `user_id`, most recent first
    pub async fn followers(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<UserResponse>> {
        let users = sqlx::query_as::<_, UserResponse>(
            r#"
            SELECT users.id, users.username, users.created_at
            FROM follows
            INNER JOIN users ON follows.user_id = users.id
            WHERE follows.followed_user_id = $1
            ORDER BY follows.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Users `user_id` follows, most recent first
    pub async fn following(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<UserResponse>> {
        let users = sqlx::query_as::<_, UserResponse>(
            r#"
            SELECT users.id, users.username, users.created_at
            FROM follows
            INNER JOIN users ON follows.followed_user_id = users.id
            WHERE follows.user_id = $1
            ORDER BY follows.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn count_followers(&self, user_id: Uuid) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followed_user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn count_following(&self, user_id: Uuid) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

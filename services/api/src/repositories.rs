//! Repositories for database operations
//!
//! Every method returns `StoreResult` so constraint violations reach the
//! handlers already classified.

use common::error::StoreResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    Page,
    user::{User, UserResponse},
};

pub mod comment;
pub mod follow;
pub mod post;

pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use post::PostRepository;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<UserResponse> {
        let user = sqlx::query_as::<_, UserResponse>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Users whose name starts with `prefix`, alphabetically
    pub async fn search_by_username(
        &self,
        prefix: &str,
        page: Page,
    ) -> StoreResult<Vec<UserResponse>> {
        let pattern = format!("{}%", escape_like(prefix));

        let users = sqlx::query_as::<_, UserResponse>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE username LIKE $1
            ORDER BY username
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Rename a user; a taken name surfaces as `StoreError::DuplicateKey`
    pub async fn update_username(&self, id: Uuid, username: &str) -> StoreResult<UserResponse> {
        info!("Renaming user {} to {}", id, username);

        let user = sqlx::query_as::<_, UserResponse>(
            r#"
            UPDATE users
            SET username = $2
            WHERE id = $1
            RETURNING id, username, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replace a user's password hash
    pub async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<User> {
        info!("Updating password for user {}", id);

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = $2
            WHERE id = $1
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Escape `LIKE` metacharacters so user input only matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("ann"), "ann");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}

//! Session repository for database operations

use async_trait::async_trait;
use common::error::StoreResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{NewSession, Session},
    session::SessionStore,
};

/// PostgreSQL-backed session store
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create_session(&self, new_session: &NewSession) -> StoreResult<Session> {
        info!("Creating session for user: {}", new_session.user_id);

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, refresh_token, client_ip, is_blocked, expires_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING id, user_id, refresh_token, client_ip, is_blocked, expires_at, created_at
            "#,
        )
        .bind(new_session.id)
        .bind(new_session.user_id)
        .bind(&new_session.refresh_token)
        .bind(&new_session.client_ip)
        .bind(new_session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    async fn get_session_by_id(&self, id: Uuid) -> StoreResult<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, refresh_token, client_ip, is_blocked, expires_at, created_at
            FROM sessions
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }
}

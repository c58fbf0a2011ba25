//! Session management for refresh tokens
//!
//! Login issues a short-lived access token and a long-lived refresh token;
//! only the refresh token is persisted, as a session keyed by its payload id.
//! Refreshing re-issues the access token and leaves the refresh token as is.

use async_trait::async_trait;
use chrono::Duration;
use common::{
    error::{StoreError, StoreResult},
    token::{Payload, TokenError, TokenMaker},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{NewSession, Session};

/// Persistence for sessions
///
/// Blocking and expiry cleanup happen outside this service; only the read
/// contract and the meaning of `is_blocked` are relied on here.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, new_session: &NewSession) -> StoreResult<Session>;

    /// Returns `StoreError::NotFound` when no session has this id
    async fn get_session_by_id(&self, id: Uuid) -> StoreResult<Session>;
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("session not found")]
    SessionNotFound,

    #[error("session is blocked")]
    SessionBlocked,

    #[error("session does not belong to the token's user")]
    SessionUserMismatch,

    #[error(transparent)]
    Store(StoreError),
}

/// Credentials issued at login
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub access_payload: Payload,
    pub refresh_token: String,
    pub session: Session,
}

/// A freshly minted access token
#[derive(Debug, Clone)]
pub struct RefreshedAccess {
    pub access_token: String,
    pub access_payload: Payload,
}

/// Session manager for issuing and refreshing credentials
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    token_maker: TokenMaker,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(
        store: Arc<dyn SessionStore>,
        token_maker: TokenMaker,
        access_token_duration: Duration,
        refresh_token_duration: Duration,
    ) -> Self {
        Self {
            store,
            token_maker,
            access_token_duration,
            refresh_token_duration,
        }
    }

    pub fn refresh_token_duration(&self) -> Duration {
        self.refresh_token_duration
    }

    /// Issue an access/refresh pair for `user_id` and persist the session
    pub async fn start_session(
        &self,
        user_id: Uuid,
        client_ip: Option<String>,
    ) -> Result<IssuedSession, SessionError> {
        let (access_token, access_payload) = self
            .token_maker
            .create_token(user_id, self.access_token_duration)?;
        let (refresh_token, refresh_payload) = self
            .token_maker
            .create_token(user_id, self.refresh_token_duration)?;

        let session = self
            .store
            .create_session(&NewSession {
                id: refresh_payload.id,
                user_id,
                refresh_token: refresh_token.clone(),
                client_ip,
                expires_at: refresh_payload.expired_at,
            })
            .await
            .map_err(SessionError::Store)?;

        info!("Session {} started for user {}", session.id, user_id);

        Ok(IssuedSession {
            access_token,
            access_payload,
            refresh_token,
            session,
        })
    }

    /// Mint a new access token from a refresh token
    ///
    /// Fails closed when the session is blocked or belongs to a different
    /// user than the token's subject.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedAccess, SessionError> {
        let payload = self.token_maker.verify_token(refresh_token)?;

        let session = self
            .store
            .get_session_by_id(payload.id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => SessionError::SessionNotFound,
                other => SessionError::Store(other),
            })?;

        if session.is_blocked {
            warn!("Refresh denied: session {} is blocked", session.id);
            return Err(SessionError::SessionBlocked);
        }

        if session.user_id != payload.user_id {
            warn!(
                "Refresh denied: session {} belongs to {}, token subject is {}",
                session.id, session.user_id, payload.user_id
            );
            return Err(SessionError::SessionUserMismatch);
        }

        let (access_token, access_payload) = self
            .token_maker
            .create_token(session.user_id, self.access_token_duration)?;

        Ok(RefreshedAccess {
            access_token,
            access_payload,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use std::{collections::HashMap, sync::Mutex};

    pub const SECRET: &str = "0123456789abcdef0123456789abcdef";

    /// In-memory session store
    #[derive(Default)]
    pub struct MemorySessionStore {
        pub sessions: Mutex<HashMap<Uuid, Session>>,
    }

    impl MemorySessionStore {
        pub fn update(&self, id: Uuid, f: impl FnOnce(&mut Session)) {
            let mut sessions = self.sessions.lock().unwrap();
            f(sessions.get_mut(&id).expect("session exists"));
        }
    }

    #[async_trait]
    impl SessionStore for MemorySessionStore {
        async fn create_session(&self, new_session: &NewSession) -> StoreResult<Session> {
            let session = Session {
                id: new_session.id,
                user_id: new_session.user_id,
                refresh_token: new_session.refresh_token.clone(),
                client_ip: new_session.client_ip.clone(),
                is_blocked: false,
                expires_at: new_session.expires_at,
                created_at: Utc::now(),
            };
            let mut sessions = self.sessions.lock().unwrap();
            if sessions.contains_key(&session.id) {
                return Err(StoreError::DuplicateKey("sessions_pkey".to_string()));
            }
            sessions.insert(session.id, session.clone());
            Ok(session)
        }

        async fn get_session_by_id(&self, id: Uuid) -> StoreResult<Session> {
            self.sessions
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound)
        }
    }

    pub fn manager(store: Arc<MemorySessionStore>) -> SessionManager {
        SessionManager::new(
            store,
            TokenMaker::new(SECRET).unwrap(),
            Duration::minutes(15),
            Duration::days(7),
        )
    }

    #[tokio::test]
    async fn login_persists_refresh_session() {
        let store = Arc::new(MemorySessionStore::default());
        let manager = manager(store.clone());
        let user_id = Uuid::new_v4();

        let issued = manager
            .start_session(user_id, Some("10.0.0.1".to_string()))
            .await
            .unwrap();

        let maker = TokenMaker::new(SECRET).unwrap();
        let refresh_payload = maker.verify_token(&issued.refresh_token).unwrap();
        assert_eq!(issued.session.id, refresh_payload.id);
        assert_eq!(issued.session.refresh_token, issued.refresh_token);
        assert_eq!(issued.session.expires_at, refresh_payload.expired_at);
        assert_eq!(issued.session.client_ip.as_deref(), Some("10.0.0.1"));
        assert_ne!(issued.access_payload.id, refresh_payload.id);
        assert!(issued.access_payload.expired_at < refresh_payload.expired_at);

        assert_eq!(store.sessions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_issues_new_access_token_for_same_user() {
        let store = Arc::new(MemorySessionStore::default());
        let manager = manager(store.clone());
        let user_id = Uuid::new_v4();
        let issued = manager.start_session(user_id, None).await.unwrap();

        let refreshed = manager
            .refresh_access_token(&issued.refresh_token)
            .await
            .unwrap();

        assert_eq!(refreshed.access_payload.user_id, user_id);
        assert_ne!(refreshed.access_token, issued.access_token);
        assert_ne!(refreshed.access_payload.id, issued.access_payload.id);
        // The refresh token is not rotated.
        let session = store.get_session_by_id(issued.session.id).await.unwrap();
        assert_eq!(session.refresh_token, issued.refresh_token);
    }

    #[tokio::test]
    async fn blocked_session_is_denied() {
        let store = Arc::new(MemorySessionStore::default());
        let manager = manager(store.clone());
        let issued = manager.start_session(Uuid::new_v4(), None).await.unwrap();
        store.update(issued.session.id, |s| s.is_blocked = true);

        let result = manager.refresh_access_token(&issued.refresh_token).await;
        assert!(matches!(result, Err(SessionError::SessionBlocked)));
    }

    #[tokio::test]
    async fn session_of_another_user_is_denied() {
        let store = Arc::new(MemorySessionStore::default());
        let manager = manager(store.clone());
        let issued = manager.start_session(Uuid::new_v4(), None).await.unwrap();
        store.update(issued.session.id, |s| s.user_id = Uuid::new_v4());

        let result = manager.refresh_access_token(&issued.refresh_token).await;
        assert!(matches!(result, Err(SessionError::SessionUserMismatch)));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = Arc::new(MemorySessionStore::default());
        let manager = manager(store);
        let (orphan, _) = TokenMaker::new(SECRET)
            .unwrap()
            .create_token(Uuid::new_v4(), Duration::days(1))
            .unwrap();

        let result = manager.refresh_access_token(&orphan).await;
        assert!(matches!(result, Err(SessionError::SessionNotFound)));
    }

    #[tokio::test]
    async fn expired_or_forged_refresh_tokens_are_rejected() {
        let store = Arc::new(MemorySessionStore::default());
        let manager = manager(store);
        let maker = TokenMaker::new(SECRET).unwrap();

        let (expired, _) = maker
            .create_token(Uuid::new_v4(), -Duration::minutes(1))
            .unwrap();
        assert!(matches!(
            manager.refresh_access_token(&expired).await,
            Err(SessionError::Token(TokenError::ExpiredToken))
        ));

        assert!(matches!(
            manager.refresh_access_token("v1.local.forged").await,
            Err(SessionError::Token(TokenError::InvalidToken))
        ));
    }
}

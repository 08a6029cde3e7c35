//! Admin sessions for the dashboard.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("session not found")]
    UnknownSession,

    #[error("session expired")]
    Expired,
}

/// An authenticated dashboard session
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[async_trait]
pub trait SessionManager: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError>;

    /// Look up a live session by token
    async fn validate(&self, token: &str) -> Result<Session, AuthError>;

    /// Replace a live session with a fresh token and expiry
    async fn refresh(&self, token: &str) -> Result<Session, AuthError>;

    /// Returns whether a session was revoked
    async fn logout(&self, token: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Session table kept in process memory
pub struct InMemorySessions {
    credentials: AdminCredentials,
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessions {
    pub fn new(credentials: AdminCredentials, ttl: Duration) -> Self {
        Self {
            credentials,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn issue(&self, username: &str, now: DateTime<Utc>) -> Session {
        Session {
            token: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            issued_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Drop every expired session
    pub async fn prune(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        drop_expired(&mut sessions, Utc::now())
    }

    /// Sessions currently held, expired ones included until pruned
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn drop_expired(sessions: &mut HashMap<String, Session>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| !s.is_expired_at(now));
    before - sessions.len()
}

#[async_trait]
impl SessionManager for InMemorySessions {
    async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username != self.credentials.username || password != self.credentials.password {
            warn!("Rejected dashboard login for '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let session = self.issue(username, now);
        let mut sessions = self.sessions.write().await;
        let dropped = drop_expired(&mut sessions, now);
        if dropped > 0 {
            debug!("Dropped {} expired sessions", dropped);
        }
        sessions.insert(session.token.clone(), session.clone());
        info!("Dashboard login for '{}'", username);
        Ok(session)
    }

    async fn validate(&self, token: &str) -> Result<Session, AuthError> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(AuthError::UnknownSession)?;

        if session.is_expired_at(Utc::now()) {
            self.sessions.write().await.remove(token);
            return Err(AuthError::Expired);
        }
        Ok(session)
    }

    async fn refresh(&self, token: &str) -> Result<Session, AuthError> {
        // One guard for the whole swap, so a token can only be redeemed once.
        let mut sessions = self.sessions.write().await;
        let current = sessions.remove(token).ok_or(AuthError::UnknownSession)?;
        let now = Utc::now();
        if current.is_expired_at(now) {
            return Err(AuthError::Expired);
        }

        let fresh = self.issue(&current.username, now);
        sessions.insert(fresh.token.clone(), fresh.clone());
        Ok(fresh)
    }

    async fn logout(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

//! Per-visitor state kept between page loads.
//!
//! Holds what a logged-in visitor carries from page to page: the backend bearer
//! token, role, user id and display name, the chat transcript, and a one-shot notice
//! shown on the next rendered page. Sessions live in memory only, expire after the
//! configured TTL and are lost when the portal restarts.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::chat::ChatSession;
use crate::models::Role;

/// Opaque value stored in the session cookie.
pub type SessionToken = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Message for the visitor, displayed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionData {
    /// Bearer token issued by the backend at login.
    pub token: String,
    pub role: Role,
    pub user_id: i64,
    pub full_name: String,
    pub chat: ChatSession,
    pub notice: Option<Notice>,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String, role: Role, user_id: i64, full_name: String) -> Self {
        Self {
            token,
            role,
            user_id,
            full_name,
            chat: ChatSession::new(),
            notice: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.created_at + ttl <= now
    }
}

/// In-memory session store shared by all handlers.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, SessionData>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store `data` under a fresh random token and return the token. Expired
    /// sessions are dropped on the way.
    pub async fn create(&self, data: SessionData) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        sessions.insert(token.clone(), data);
        token
    }

    /// The live session under `token`. An expired one is removed and reported as
    /// missing.
    pub async fn get(&self, token: &str) -> Option<SessionData> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            let data = sessions.get(token)?;
            if !data.is_expired(self.ttl, now) {
                return Some(data.clone());
            }
        }
        tracing::debug!("session expired");
        self.destroy(token).await;
        None
    }

    /// Apply `f` to the session under `token`. Returns false when there is no such
    /// session.
    pub async fn update<F>(&self, token: &str, f: F) -> bool
    where
        F: FnOnce(&mut SessionData),
    {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(data) => {
                f(data);
                true
            }
            None => false,
        }
    }

    pub async fn set_notice(&self, token: &str, notice: Notice) {
        self.update(token, |data| data.notice = Some(notice)).await;
    }

    /// Remove and return the pending notice, if any.
    pub async fn take_notice(&self, token: &str) -> Option<Notice> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(token).and_then(|data| data.notice.take())
    }

    pub async fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

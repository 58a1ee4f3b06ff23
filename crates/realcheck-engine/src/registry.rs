//! Live sessions keyed by participant

use crate::session::Session;
use chrono::{DateTime, Duration, Utc};
use realcheck_types::UserId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Handle to one live session. The mutex serializes a participant's calls.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Registry of live sessions.
///
/// The map lock is only held to look up or insert a handle; work on a
/// session happens under that session's own mutex, so participants never
/// wait on each other.
#[derive(Debug, Default)]
pub struct Sessions {
    inner: RwLock<HashMap<UserId, SessionHandle>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: &UserId) -> Option<SessionHandle> {
        self.inner.read().await.get(user_id).cloned()
    }

    /// Register `session`, replacing any previous session for the same user.
    pub async fn insert(&self, session: Session) -> SessionHandle {
        let user_id = session.user_id().clone();
        let handle = Arc::new(Mutex::new(session));
        self.inner
            .write()
            .await
            .insert(user_id, Arc::clone(&handle));
        handle
    }

    pub async fn remove(&self, user_id: &UserId) -> Option<SessionHandle> {
        self.inner.write().await.remove(user_id)
    }

    /// Drop every expired session and return how many were dropped.
    ///
    /// A session whose lock is held is in use and is kept.
    pub async fn evict_expired(
        &self,
        now: DateTime<Utc>,
        idle_ttl: Duration,
        completed_grace: Duration,
    ) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| {
            let expired = match handle.try_lock() {
                Ok(session) => session.is_expired(now, idle_ttl, completed_grace),
                Err(_) => false,
            };
            !expired
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

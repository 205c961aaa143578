use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use super::session::Session;

/// In-memory sessions keyed by user id.
///
/// Each user gets their own lock, so a message is handled as one
/// read-modify-write step without blocking other users.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Arc<AsyncMutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's session, created on first use
    pub fn entry(&self, user_id: i64) -> Arc<AsyncMutex<Session>> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.entry(user_id).or_default().clone()
    }

    pub async fn snapshot(&self, user_id: i64) -> Session {
        self.entry(user_id).lock().await.clone()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskKind;

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let store = SessionStore::new();
        store.entry(1).lock().await.enter(TaskKind::Legal);

        assert!(store.snapshot(1).await.active_kind() == Some(TaskKind::Legal));
        assert!(store.snapshot(2).await.active_kind().is_none());
        assert_eq!(store.len(), 2);
    }
}

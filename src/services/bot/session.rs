use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::models::ChatSession;

/// Owns every live conversation, keyed by an opaque session id (web
/// console UUID or WhatsApp phone number). Each session sits behind its
/// own async mutex so messages for one session are handled one at a
/// time while distinct sessions proceed in parallel.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<AsyncMutex<ChatSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, key: &str) -> Arc<AsyncMutex<ChatSession>> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(ChatSession::default())))
            .clone()
    }

    /// Drops the session. Returns false when no session existed, which
    /// callers report as a benign no-op.
    pub fn reset(&self, key: &str) -> bool {
        self.sessions.lock().unwrap().remove(key).is_some()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_returns_same_session() {
        let store = SessionStore::new();
        {
            let session = store.get_or_create("abc");
            session.lock().await.record_greeting();
        }

        let session = store.get_or_create("abc");
        assert_eq!(session.lock().await.greeting_count, 1);
    }

    #[test]
    fn reset_reports_whether_session_existed() {
        let store = SessionStore::new();
        assert!(!store.reset("missing"));

        store.get_or_create("abc");
        assert!(store.exists("abc"));
        assert!(store.reset("abc"));
        assert!(!store.exists("abc"));
    }
}

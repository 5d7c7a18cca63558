use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::conversation::Conversation;

const MAX_IDLE_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub conversation: Conversation,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    fn new(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            conversation: Conversation::new(),
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_active_at {
            self.last_active_at = now;
        }
    }

    fn is_idle(&self, now: DateTime<Utc>, idle_ttl: Duration) -> bool {
        now - self.last_active_at > idle_ttl
    }
}

/// In-memory registry of chat sessions, one conversation per session.
///
/// Each session sits behind its own mutex; holding it across a resolve keeps
/// exchanges for one conversation strictly sequential. Nothing survives a
/// process restart.
#[derive(Clone)]
pub struct ConversationStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    idle_ttl: Duration,
}

impl ConversationStore {
    pub fn new(idle_ttl_seconds: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl: Duration::seconds(idle_ttl_seconds.min(MAX_IDLE_TTL_SECONDS) as i64),
        }
    }

    pub async fn create(&self, now: DateTime<Utc>) -> (Uuid, SessionHandle) {
        self.purge_idle(now).await;

        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Session::new(id, now)));
        self.sessions.write().await.insert(id, handle.clone());
        (id, handle)
    }

    pub async fn get(&self, id: Uuid, now: DateTime<Utc>) -> Option<SessionHandle> {
        self.purge_idle(now).await;
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle for longer than the configured TTL and returns how
    /// many were removed. A session whose lock is held is in use and kept.
    pub async fn purge_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => !session.is_idle(now, self.idle_ttl),
            Err(_) => true,
        });
        let purged = before - sessions.len();
        if purged > 0 {
            debug!(purged, remaining = sessions.len(), "purged idle chat sessions");
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::ConversationStore;

    #[tokio::test]
    async fn created_sessions_are_retrievable_and_isolated() {
        let store = ConversationStore::new(3600);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

        let (first_id, first) = store.create(now).await;
        let (second_id, _) = store.create(now).await;
        assert_ne!(first_id, second_id);

        first
            .lock()
            .await
            .conversation
            .record_exchange("question", "answer");

        let second = store
            .get(second_id, now)
            .await
            .expect("second session should exist");
        assert!(second.lock().await.conversation.context().is_empty());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn idle_sessions_are_purged_after_ttl() {
        let store = ConversationStore::new(60);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let (stale_id, _) = store.create(now).await;
        let (fresh_id, fresh) = store.create(now).await;

        let later = now + Duration::seconds(90);
        fresh.lock().await.touch(later - Duration::seconds(10));

        assert!(store.get(stale_id, later).await.is_none());
        assert!(store.get(fresh_id, later).await.is_some());
    }

    #[tokio::test]
    async fn locked_sessions_survive_purge() {
        let store = ConversationStore::new(1);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let (_, handle) = store.create(now).await;

        let _guard = handle.lock().await;
        let purged = store.purge_idle(now + Duration::seconds(30)).await;
        assert_eq!(purged, 0);
    }

    #[tokio::test]
    async fn remove_reports_whether_session_existed() {
        let store = ConversationStore::new(60);
        let now = Utc::now();
        let (id, _) = store.create(now).await;

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.is_empty().await);
    }
}

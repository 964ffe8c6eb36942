//! In-memory SessionRepository implementation.
//!
//! Useful for tests and embedded setups where persistence across restarts
//! is not needed. Sessions live in a shared map behind an async `RwLock`.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use vigil_core::session::{Session, SessionRepository};

/// Map-backed session repository.
#[derive(Default, Clone)]
pub struct MemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn test_now() -> DateTime<Utc> {
        "2024-03-01T09:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let repository = MemorySessionRepository::new();
        let session =
            Session::create("Ada Lovelace", "ada@example.com", "Backend Engineer", test_now())
                .unwrap();

        repository.save(&session).await.unwrap();
        assert_eq!(repository.len().await, 1);

        let loaded = repository.find_by_id(&session.id).await.unwrap();
        assert_eq!(loaded, Some(session.clone()));

        repository.delete(&session.id).await.unwrap();
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let repository = MemorySessionRepository::new();
        let older = Session::create("A", "a@example.com", "T", test_now()).unwrap();
        let newer =
            Session::create("B", "b@example.com", "T", test_now() + Duration::minutes(5)).unwrap();

        repository.save(&older).await.unwrap();
        repository.save(&newer).await.unwrap();

        let sessions = repository.list_all().await.unwrap();
        assert_eq!(sessions[0].id, newer.id);
    }
}

//! Session cache contract and the in-memory implementation.

use super::models::PlayerSession;
use crate::game::Amount;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Lookup of player sessions by connection key.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Fetch the session for a connection
    async fn get(&self, session_key: &str) -> Option<PlayerSession>;

    /// Insert or replace the session for a connection
    async fn set(&self, session_key: &str, session: PlayerSession);

    /// Drop the session for a connection
    async fn remove(&self, session_key: &str) -> Option<PlayerSession>;

    /// Apply `delta` to the cached balance as one read-modify-write.
    ///
    /// Returns the new balance, or `None` when no session is cached.
    async fn adjust_balance(&self, session_key: &str, delta: Amount) -> Option<Amount>;
}

/// Session cache backed by a map behind a tokio `RwLock`
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    sessions: RwLock<HashMap<String, PlayerSession>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn get(&self, session_key: &str) -> Option<PlayerSession> {
        self.sessions.read().await.get(session_key).cloned()
    }

    async fn set(&self, session_key: &str, session: PlayerSession) {
        self.sessions
            .write()
            .await
            .insert(session_key.to_string(), session);
    }

    async fn remove(&self, session_key: &str) -> Option<PlayerSession> {
        self.sessions.write().await.remove(session_key)
    }

    async fn adjust_balance(&self, session_key: &str, delta: Amount) -> Option<Amount> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_key)?;
        session.balance = session.balance.saturating_add(delta);
        Some(session.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn session(balance: Amount) -> PlayerSession {
        PlayerSession::new("p1", "op1", "tok", "aaa", balance)
    }

    #[tokio::test]
    async fn test_get_set_remove() {
        let cache = MemorySessionCache::new();
        assert!(cache.get("s1").await.is_none());

        cache.set("s1", session(100)).await;
        assert_eq!(cache.get("s1").await.map(|s| s.balance), Some(100));
        assert_eq!(cache.len().await, 1);

        cache.remove("s1").await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_adjust_missing_session() {
        let cache = MemorySessionCache::new();
        assert_eq!(cache.adjust_balance("nobody", 50).await, None);
    }

    #[tokio::test]
    async fn test_concurrent_adjustments_are_not_lost() {
        let cache = Arc::new(MemorySessionCache::new());
        cache.set("s1", session(10_000)).await;

        let mut tasks = Vec::new();
        for i in 0..50 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                let delta = if i % 2 == 0 { -100 } else { 300 };
                cache.adjust_balance("s1", delta).await
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // 25 debits of 100 and 25 credits of 300
        assert_eq!(cache.get("s1").await.unwrap().balance, 10_000 + 25 * 200);
    }
}

//! Registry of running sessions, keyed by their game channel.

use crate::game::{GameSession, SessionServices, SharedSession};
use crate::transport::ChannelId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns every session of one host.
///
/// Lookups clone the session handles out of the map before locking any
/// session, so the registry lock is never held while a command runs.
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<ChannelId, SharedSession>>>,
    services: SessionServices,
}

impl SessionRegistry {
    pub fn new(services: SessionServices) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            services,
        }
    }

    /// Returns the session of `channel`, creating it named `name` if needed.
    pub async fn get_or_create(&self, channel: &ChannelId, name: &str) -> SharedSession {
        if let Some(session) = self.get(channel).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(channel.clone())
            .or_insert_with(|| GameSession::shared(name, channel.clone(), self.services.clone()))
            .clone()
    }

    pub async fn get(&self, channel: &ChannelId) -> Option<SharedSession> {
        self.sessions.read().await.get(channel).cloned()
    }

    /// Finds the session whose werewolves talk in `channel`.
    pub async fn find_by_secret_channel(&self, channel: &ChannelId) -> Option<SharedSession> {
        for session in self.snapshot().await {
            if session.lock().await.is_secret_channel(channel) {
                return Some(session);
            }
        }
        None
    }

    /// Finds the session in which `name` is seated.
    pub async fn find_by_player(&self, name: &str) -> Option<SharedSession> {
        for session in self.snapshot().await {
            if session.lock().await.find_player_by_name(name).is_some() {
                return Some(session);
            }
        }
        None
    }

    /// Removes and closes the session of `channel`.
    pub async fn remove(&self, channel: &ChannelId) -> bool {
        let removed = self.sessions.write().await.remove(channel);
        match removed {
            Some(session) => {
                session.lock().await.close().await;
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn snapshot(&self) -> Vec<SharedSession> {
        self.sessions.read().await.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::error::Result;
    use crate::transport::Transport;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct NullTransport {
        deleted: Mutex<Vec<ChannelId>>,
    }

    #[async_trait]
    impl Transport for NullTransport {
        async fn send_to_channel(&self, _channel: &ChannelId, _text: &str) {}

        async fn send_direct_message(&self, _seat: &str, _text: &str) {}

        async fn create_secret_channel(&self, name: &str) -> Result<ChannelId> {
            Ok(ChannelId::new(name))
        }

        async fn delete_secret_channel(&self, channel: &ChannelId) {
            self.deleted.lock().unwrap().push(channel.clone());
        }
    }

    fn registry() -> (SessionRegistry, Arc<NullTransport>) {
        let transport = Arc::new(NullTransport::default());
        let services = SessionServices::new(transport.clone());
        (SessionRegistry::new(services), transport)
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_session() {
        let (registry, _) = registry();
        let channel = ChannelId::new("village");

        let first = registry.get_or_create(&channel, "village").await;
        let second = registry.get_or_create(&channel, "ignored").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().await.name(), "village");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_player() {
        let (registry, _) = registry();
        let village = registry.get_or_create(&ChannelId::new("village"), "village").await;
        registry.get_or_create(&ChannelId::new("town"), "town").await;

        village.lock().await.handle(Command::join("Alice")).await.unwrap();

        let found = registry.find_by_player("Alice").await.unwrap();
        assert!(Arc::ptr_eq(&found, &village));
        assert!(registry.find_by_player("Bob").await.is_none());
    }

    #[tokio::test]
    async fn test_find_by_secret_channel_after_start() {
        let (registry, _) = registry();
        let village = registry.get_or_create(&ChannelId::new("village"), "village").await;
        {
            let mut session = village.lock().await;
            for name in ["Alice", "Bob", "Carol", "Dave"] {
                session.handle(Command::join(name)).await.unwrap();
            }
            session.handle(Command::Start).await.unwrap();
        }

        let secret = ChannelId::new("WerewolvesOnly_village");
        let found = registry.find_by_secret_channel(&secret).await.unwrap();
        assert!(Arc::ptr_eq(&found, &village));
        assert!(registry.find_by_secret_channel(&ChannelId::new("village")).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_closes_the_session() {
        let (registry, transport) = registry();
        let channel = ChannelId::new("village");
        let village = registry.get_or_create(&channel, "village").await;
        {
            let mut session = village.lock().await;
            for name in ["Alice", "Bob", "Carol", "Dave"] {
                session.handle(Command::join(name)).await.unwrap();
            }
            session.handle(Command::Start).await.unwrap();
        }

        assert!(registry.remove(&channel).await);
        assert!(!registry.remove(&channel).await);
        assert!(registry.is_empty().await);
        assert!(village.lock().await.players().is_empty());
        assert_eq!(
            transport.deleted.lock().unwrap().clone(),
            vec![ChannelId::new("WerewolvesOnly_village")]
        );
    }
}

use crate::message::Frame;
use dashmap::DashMap;
use log::*;
use tokio::sync::mpsc::Sender;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live subscriber queues keyed by connection.
///
/// Every path that ends a session (stream drop, explicit unsubscribe, a
/// closed queue found while publishing, shutdown) goes through `unregister`
/// or `clear`, so a session is removed exactly once.
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Sender<Frame>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection - O(1)
    pub fn register(&self, sender: Sender<Frame>) -> ConnectionId {
        let connection_id = ConnectionId::new();
        self.connections.insert(connection_id.clone(), sender);
        connection_id
    }

    /// Unregister a connection - O(1). Returns `true` only for the call that
    /// actually removed it.
    pub fn unregister(&self, connection_id: &ConnectionId) -> bool {
        match self.connections.remove(connection_id) {
            Some(_) => {
                debug!("Unregistered SSE connection {connection_id}");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Clones every sender out of the map. The shard locks are released
    /// before this returns, so callers may send without holding them.
    pub fn snapshot(&self) -> Vec<(ConnectionId, Sender<Frame>)> {
        self.connections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Drops every sender, ending all subscriber queues. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let ids: Vec<ConnectionId> = self
            .connections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.iter().filter(|id| self.unregister(id)).count()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

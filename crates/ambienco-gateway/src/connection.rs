use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// A connected chat widget.
#[derive(Debug)]
pub struct Connection {
    /// Connection id, fresh per socket.
    pub id: Uuid,
    /// Chat session the socket was opened for.
    pub session_id: Uuid,
    /// Outbound queue drained into the socket.
    pub tx: mpsc::UnboundedSender<String>,
}

/// Tracks open WebSocket connections.
pub struct ConnectionManager {
    connections: RwLock<HashMap<Uuid, Connection>>,
}

impl ConnectionManager {
    /// Empty manager, shared.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a connection.
    pub async fn add(&self, conn: Connection) {
        let id = conn.id;
        self.connections.write().await.insert(id, conn);
        tracing::info!(connection_id = %id, "Connection added");
    }

    /// Forget a connection.
    pub async fn remove(&self, id: Uuid) {
        self.connections.write().await.remove(&id);
        tracing::info!(connection_id = %id, "Connection removed");
    }

    /// Queue `message` for one connection. Returns `false` if it is gone.
    pub async fn send_to(&self, connection_id: Uuid, message: &str) -> bool {
        let conns = self.connections.read().await;
        match conns.get(&connection_id) {
            Some(conn) => conn.tx.send(message.to_string()).is_ok(),
            None => false,
        }
    }

    /// Chat session a connection was opened for.
    pub async fn session_of(&self, connection_id: Uuid) -> Option<Uuid> {
        self.connections
            .read()
            .await
            .get(&connection_id)
            .map(|conn| conn.session_id)
    }

    /// Number of open connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_to_connection() {
        let manager = ConnectionManager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        manager.add(Connection { id, session_id, tx }).await;

        assert_eq!(manager.connection_count().await, 1);
        assert_eq!(manager.session_of(id).await, Some(session_id));
        assert!(manager.send_to(id, "hello").await);
        assert_eq!(rx.recv().await.unwrap(), "hello");

        manager.remove(id).await;
        assert!(!manager.send_to(id, "gone").await);
        assert_eq!(manager.session_of(id).await, None);
        assert_eq!(manager.connection_count().await, 0);
    }
}

use std::collections::HashMap;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::{mpsc, RwLock};

use crate::models::DbId;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// One authenticated notification socket.
pub struct WsConnection {
    pub user_id: DbId,
    pub sender: WsSender,
    pub connected_at: DateTime<Utc>,
}

/// Live notification sockets, keyed by connection id.
///
/// A user may hold several connections (tabs, devices); pushes fan out to
/// all of them. Nothing is buffered for users who are offline.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a connection and returns the receiver feeding its sink.
    pub async fn add(&self, conn_id: String, user_id: DbId) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            sender: tx,
            connected_at: Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    pub async fn remove(&self, conn_id: &str) {
        if let Some(conn) = self.connections.write().await.remove(conn_id) {
            tracing::debug!(
                conn_id,
                user_id = conn.user_id,
                seconds = (Utc::now() - conn.connected_at).num_seconds(),
                "Connection removed"
            );
        }
    }

    /// Send a message to all connections belonging to a specific user.
    ///
    /// Returns the number of connections the message was sent to.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values().filter(|c| c.user_id == user_id) {
            if conn.sender.send(message.clone()).is_ok() {
                count += 1;
            }
        }
        count
    }

    /// Pushes a `{"message": ...}` text frame to every socket of the user.
    pub async fn notify_user(&self, user_id: DbId, message: &str) -> usize {
        let frame = json!({ "message": message }).to_string();
        self.send_to_user(user_id, Message::Text(frame)).await
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Vec::new()));
        }
    }

    /// Send a Close frame to every connection, then clear the map.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_reaches_every_socket_of_the_user_only() {
        let manager = WsManager::new();
        let mut first = manager.add("a".to_string(), 1).await;
        let mut second = manager.add("b".to_string(), 1).await;
        let mut other = manager.add("c".to_string(), 2).await;

        assert_eq!(manager.notify_user(1, "New job match").await, 2);

        for rx in [&mut first, &mut second] {
            match rx.try_recv().unwrap() {
                Message::Text(text) => {
                    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                    assert_eq!(value, json!({"message": "New job match"}));
                }
                other => panic!("unexpected frame {other:?}"),
            }
        }
        assert!(other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_removed_connection_receives_nothing() {
        let manager = WsManager::new();
        let _rx = manager.add("a".to_string(), 1).await;
        manager.remove("a").await;

        assert_eq!(manager.connection_count().await, 0);
        assert_eq!(manager.notify_user(1, "hello").await, 0);
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_not_counted() {
        let manager = WsManager::new();
        drop(manager.add("a".to_string(), 1).await);
        assert_eq!(manager.notify_user(1, "hello").await, 0);
    }

    #[tokio::test]
    async fn test_ping_and_shutdown() {
        let manager = WsManager::new();
        let mut rx = manager.add("a".to_string(), 1).await;

        manager.ping_all().await;
        assert!(matches!(rx.try_recv(), Ok(Message::Ping(_))));

        manager.shutdown_all().await;
        assert!(matches!(rx.try_recv(), Ok(Message::Close(None))));
        assert_eq!(manager.connection_count().await, 0);
    }
}

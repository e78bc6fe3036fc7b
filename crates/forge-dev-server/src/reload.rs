//! Live-reload channel
//!
//! An explicit broadcast handle between the build tasks and connected
//! browser clients. Tasks that publish change events take a clone of the
//! channel as a parameter; nothing reaches it through global state.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Reload message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReloadMessage {
    /// Freshly written output files; all-CSS updates hot-swap stylesheets
    Update { paths: Vec<String> },

    /// Full page reload required
    FullReload { reason: String },

    /// Connected confirmation
    Connected,
}

/// Broadcast handle for live-reload notifications
#[derive(Clone)]
pub struct ReloadChannel {
    tx: broadcast::Sender<ReloadMessage>,
}

impl ReloadChannel {
    /// Create a new reload channel
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { tx }
    }

    /// Broadcast a message to all connected clients. Returns immediately;
    /// clients are never waited on.
    pub fn broadcast(&self, message: ReloadMessage) {
        let _ = self.tx.send(message);
    }

    /// Publish freshly written output paths for hot-swapping
    pub fn stream(&self, paths: Vec<String>) {
        self.broadcast(ReloadMessage::Update { paths });
    }

    /// Ask all connected clients to reload the page
    pub fn reload(&self, reason: &str) {
        self.broadcast(ReloadMessage::FullReload {
            reason: reason.to_string(),
        });
    }

    /// Subscribe to reload messages
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.tx.subscribe()
    }

    /// Get number of connected subscribers
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ReloadChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_creation() {
        let channel = ReloadChannel::new();
        assert_eq!(channel.client_count(), 0);
    }

    #[tokio::test]
    async fn test_subscribe_receives_broadcast() {
        let channel = ReloadChannel::new();
        let mut rx = channel.subscribe();
        assert_eq!(channel.client_count(), 1);

        channel.stream(vec!["dist/css/a.css".to_string()]);

        match rx.recv().await.unwrap() {
            ReloadMessage::Update { paths } => assert_eq!(paths, vec!["dist/css/a.css"]),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_broadcast_without_clients_is_fine() {
        let channel = ReloadChannel::new();
        channel.reload("html changed");
    }

    #[test]
    fn test_message_wire_format() {
        let json = serde_json::to_string(&ReloadMessage::FullReload {
            reason: "index.html".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"type\":\"full-reload\""));
    }
}

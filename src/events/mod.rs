use serde::Serialize;
use tokio::sync::broadcast;

/// Capacity of the fan-out channel; slow subscribers past this lag lose
/// events, which is fine for an at-most-once live-update feed.
const BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Created,
    Updated,
    Deleted,
    Tick,
}

/// A change notification pushed to connected clients. Events are sent in
/// write order and are not replayed; a client that reconnects is expected to
/// do a full fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEvent {
    pub topic: &'static str,
    pub action: EventAction,
    pub payload: serde_json::Value,
}

#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<ServerEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    /// Fire-and-forget publish. Having no listeners is not an error.
    pub fn publish<T: Serialize>(&self, topic: &'static str, action: EventAction, payload: &T) {
        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Failed to serialize {} event: {}", topic, e);
                return;
            }
        };

        let _ = self.tx.send(ServerEvent {
            topic,
            action,
            payload,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

//! Chat rooms and the in-process channel layer
//!
//! A room is addressed by a deterministic key derived from the two
//! participant user ids. Each room maps to one bounded broadcast channel;
//! every socket in the room holds a receiver. Delivery is FIFO per channel
//! and at-most-once: a receiver that lags past the channel capacity skips
//! the missed events.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::broadcast;

use crate::contract::MessageStatus;

/// Deterministic two-party room key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey(String);

impl RoomKey {
    /// Key for the pair of users, independent of argument order
    pub fn for_pair(user_a: i64, user_b: i64) -> Self {
        let (lo, hi) = if user_a <= user_b {
            (user_a, user_b)
        } else {
            (user_b, user_a)
        };
        Self(format!("chat_{}_{}", lo, hi))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Online/offline presence marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// Event fanned out to every socket in a room
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A persisted chat message (text, attachment or voice note)
    Message {
        id: i64,
        client_id: String,
        sender_id: i64,
        sender_username: String,
        body: String,
        timestamp: DateTime<Utc>,
        status: MessageStatus,
        voice_note_url: Option<String>,
        file_url: Option<String>,
    },
    /// Delivery / seen acknowledgment for a batch of message ids
    Delivery {
        message_ids: Vec<i64>,
        user_id: i64,
        status: MessageStatus,
    },
    /// A participant joined or left the room
    Presence { user_id: i64, presence: Presence },
    /// WebRTC signaling payload, forwarded verbatim
    Signal(Value),
}

impl ChatEvent {
    /// Wire frame sent to clients
    pub fn to_frame(&self) -> Value {
        match self {
            Self::Message {
                id,
                client_id,
                sender_id,
                sender_username,
                body,
                timestamp,
                status,
                voice_note_url,
                file_url,
            } => json!({
                "type": "message",
                "msg_id": id,
                "client_id": client_id,
                "sender_id": sender_id,
                "sender_username": sender_username,
                "message": body,
                "timestamp": timestamp.to_rfc3339(),
                "status": status.as_str(),
                "voice_note": voice_note_url,
                "file": file_url,
            }),
            Self::Delivery {
                message_ids,
                user_id,
                status,
            } => json!({
                "type": "delivery",
                "msg_ids": message_ids,
                "user_id": user_id,
                "status": status.as_str(),
            }),
            Self::Presence { user_id, presence } => json!({
                "type": "presence",
                "user_id": user_id,
                "status": presence.as_str(),
            }),
            Self::Signal(payload) => payload.clone(),
        }
    }
}

/// Handle to a joined room
///
/// Dropping the receiver and then calling [`RoomRegistry::leave`] releases
/// the room once the last subscriber is gone.
pub struct RoomHandle {
    pub sender: broadcast::Sender<ChatEvent>,
    pub receiver: broadcast::Receiver<ChatEvent>,
}

/// Registry of live rooms
///
/// The channel-layer equivalent: rooms are created on first join and
/// dropped when the last subscriber leaves.
pub struct RoomRegistry {
    capacity: usize,
    rooms: Mutex<HashMap<RoomKey, broadcast::Sender<ChatEvent>>>,
}

impl RoomRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to a room, creating its channel on first join
    pub fn join(&self, key: &RoomKey) -> RoomHandle {
        let mut rooms = self.rooms.lock();
        let sender = rooms
            .entry(key.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone();
        let receiver = sender.subscribe();
        RoomHandle { sender, receiver }
    }

    /// Drop the room's channel if nobody is subscribed anymore
    ///
    /// Callers must drop their receiver before leaving.
    pub fn leave(&self, key: &RoomKey) {
        let mut rooms = self.rooms.lock();
        if let Some(sender) = rooms.get(key) {
            if sender.receiver_count() == 0 {
                rooms.remove(key);
                tracing::debug!(room = %key, "room released");
            }
        }
    }

    /// Fan an event out to every socket in the room
    ///
    /// Returns the number of sockets reached; zero when the room is empty.
    pub fn publish(&self, key: &RoomKey, event: ChatEvent) -> usize {
        let sender = self.rooms.lock().get(key).cloned();
        match sender {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Number of live rooms
    pub fn len(&self) -> usize {
        self.rooms.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_key_is_order_independent() {
        assert_eq!(RoomKey::for_pair(7, 3), RoomKey::for_pair(3, 7));
        assert_eq!(RoomKey::for_pair(3, 7).as_str(), "chat_3_7");
    }

    #[test]
    fn room_is_released_after_last_leave() {
        let registry = RoomRegistry::new(8);
        let key = RoomKey::for_pair(1, 2);

        let first = registry.join(&key);
        let second = registry.join(&key);
        assert_eq!(registry.len(), 1);

        drop(first);
        registry.leave(&key);
        assert_eq!(registry.len(), 1, "one subscriber still attached");

        drop(second);
        registry.leave(&key);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn publish_reaches_all_subscribers() {
        let registry = RoomRegistry::new(8);
        let key = RoomKey::for_pair(1, 2);

        let mut a = registry.join(&key);
        let mut b = registry.join(&key);

        let reached = registry.publish(
            &key,
            ChatEvent::Presence {
                user_id: 1,
                presence: Presence::Online,
            },
        );
        assert_eq!(reached, 2);

        for rx in [&mut a.receiver, &mut b.receiver] {
            match rx.recv().await {
                Ok(ChatEvent::Presence { user_id, presence }) => {
                    assert_eq!(user_id, 1);
                    assert_eq!(presence, Presence::Online);
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[test]
    fn signal_frames_pass_through_verbatim() {
        let payload = json!({"type": "ice_candidate", "candidate": {"sdpMid": "0"}});
        let event = ChatEvent::Signal(payload.clone());
        assert_eq!(event.to_frame(), payload);
    }
}

//! Client-server message protocol.
//!
//! Every WebSocket frame is a JSON object `{type, payload}`. Request/response
//! pairs are acknowledged with dedicated ack events (`joinAck`, `sendAck`);
//! everything else is fire-and-forget.

use serde::{Deserialize, Serialize};

/// Client -> server messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    // Room Management
    Join { room_code: String, name: String },
    Leave,

    // Chat
    SendMessage { text: String },

    // Voice presence
    VoiceJoin,
    VoiceLeave,
    VoiceActivity { speaking: bool },

    // WebRTC Signaling (payloads are opaque to the server)
    SignalOffer {
        target_session_id: String,
        payload: serde_json::Value,
    },
    SignalAnswer {
        target_session_id: String,
        payload: serde_json::Value,
    },
    SignalCandidate {
        target_session_id: String,
        payload: serde_json::Value,
    },
}

/// Server -> client messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    // Connection
    Session { session_id: String },

    // Acks
    JoinAck {
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        room_code: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    SendAck { ok: bool },

    // Room Events
    RoomHistory(Vec<Message>),
    ChatMessage(Message),
    RoomUsers(Vec<RoomUser>),
    UserLeft { session_id: String },
    LeftRoom { room_code: String },

    // Voice
    VoiceActivity { session_id: String, speaking: bool },

    // WebRTC Signaling
    SignalOffer {
        from: String,
        payload: serde_json::Value,
    },
    SignalAnswer {
        from: String,
        payload: serde_json::Value,
    },
    SignalCandidate {
        from: String,
        payload: serde_json::Value,
    },
}

/// A chat message. Immutable once created; evicted only by the room's
/// history cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_session_id: String,
    /// Display name snapshot at send time.
    pub name: String,
    pub text: String,
    pub timestamp: u64,
}

/// One entry of a presence broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUser {
    pub id: String,
    pub name: String,
    pub in_voice: bool,
    pub speaking: bool,
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

//! Chat relay.

use crate::error::ClientError;
use crate::handlers::room::{broadcast_to_room, send_to_session};
use crate::protocol::{now_millis, Message, ServerMessage};
use crate::state::AppState;
use uuid::Uuid;

/// Append a chat message to the bound room and broadcast it to every member,
/// sender included. Unbound sessions and empty texts are acked as not-ok
/// without touching any room.
pub async fn handle_send_message(state: &AppState, session_id: &str, text: &str) {
    let text = text.trim();

    let room_code = match state.sessions.get(session_id) {
        Some(session) => session.room_code.read().await.clone(),
        None => None,
    };

    let Some(room_code) = room_code else {
        tracing::debug!(session_id = %session_id, error = ClientError::NotBound.code(), "Chat rejected");
        send_to_session(state, session_id, ServerMessage::SendAck { ok: false });
        return;
    };
    if text.is_empty() {
        tracing::debug!(session_id = %session_id, error = ClientError::InvalidInput.code(), "Chat rejected");
        send_to_session(state, session_id, ServerMessage::SendAck { ok: false });
        return;
    }

    let message = {
        let Some(room) = state.rooms.get(&room_code) else {
            send_to_session(state, session_id, ServerMessage::SendAck { ok: false });
            return;
        };
        let mut inner = room.inner.write().await;
        // Name snapshot comes from the participant record, so a message
        // keeps the sender's name even after they leave.
        let Some(participant) = inner.participants.get(session_id) else {
            drop(inner);
            send_to_session(state, session_id, ServerMessage::SendAck { ok: false });
            return;
        };
        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender_session_id: session_id.to_string(),
            name: participant.name.clone(),
            text: text.to_string(),
            timestamp: now_millis(),
        };
        inner.push_message(message.clone());
        message
    };

    send_to_session(state, session_id, ServerMessage::SendAck { ok: true });
    broadcast_to_room(state, &room_code, ServerMessage::ChatMessage(message)).await;
}

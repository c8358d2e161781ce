//! WebRTC signaling relay.
//!
//! The relay is a pure pass-through: payloads are opaque and forwarded
//! verbatim, stamped with the sender's session id. A message is delivered
//! only when sender and target share a room and both are in voice; anything
//! else is dropped without feedback, so non-members cannot probe a room's
//! voice membership.

use crate::handlers::room::send_to_session;
use crate::protocol::ServerMessage;
use crate::state::AppState;

/// The three negotiation message kinds the relay forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

/// Forward a negotiation message to the targeted session, or drop it.
pub async fn handle_signal(
    state: &AppState,
    from_session_id: &str,
    target_session_id: &str,
    kind: SignalKind,
    payload: serde_json::Value,
) {
    if payload.is_null() || target_session_id.is_empty() {
        return;
    }

    let room_code = match state.sessions.get(from_session_id) {
        Some(session) => session.room_code.read().await.clone(),
        None => None,
    };
    let Some(room_code) = room_code else {
        return;
    };

    let authorized = {
        let Some(room) = state.rooms.get(&room_code) else {
            return;
        };
        let inner = room.inner.read().await;
        let sender_ok = inner
            .participants
            .get(from_session_id)
            .is_some_and(|p| p.in_voice);
        // Target membership in this room implies both are in the same room.
        let target_ok = inner
            .participants
            .get(target_session_id)
            .is_some_and(|p| p.in_voice);
        sender_ok && target_ok
    };

    if !authorized {
        tracing::debug!(
            from = %from_session_id,
            target = %target_session_id,
            room_code = %room_code,
            kind = ?kind,
            "Dropped unauthorized signal"
        );
        return;
    }

    let from = from_session_id.to_string();
    let message = match kind {
        SignalKind::Offer => ServerMessage::SignalOffer { from, payload },
        SignalKind::Answer => ServerMessage::SignalAnswer { from, payload },
        SignalKind::Candidate => ServerMessage::SignalCandidate { from, payload },
    };

    send_to_session(state, target_session_id, message);

    tracing::debug!(
        from = %from_session_id,
        target = %target_session_id,
        room_code = %room_code,
        kind = ?kind,
        "Relayed signal"
    );
}

//! Voice-channel presence and speaking activity.

use crate::handlers::room::{broadcast_room_users, broadcast_to_room};
use crate::state::AppState;

/// Toggle the participant's voice-channel membership. Turning voice off also
/// clears the speaking flag. Ignored for unbound sessions.
pub async fn handle_voice_toggle(state: &AppState, session_id: &str, in_voice: bool) {
    let Some(room_code) = bound_room(state, session_id).await else {
        return;
    };

    let changed = {
        let Some(room) = state.rooms.get(&room_code) else {
            return;
        };
        let mut inner = room.inner.write().await;
        match inner.participants.get_mut(session_id) {
            Some(participant) => {
                participant.in_voice = in_voice;
                if !in_voice {
                    participant.speaking = false;
                }
                true
            }
            None => false,
        }
    };

    if changed {
        tracing::debug!(session_id = %session_id, room_code = %room_code, in_voice, "Voice toggled");
        broadcast_room_users(state, &room_code).await;
    }
}

/// Relay a speaking-activity change to the room. Only honored while the
/// participant is in voice; a lightweight event, not a presence broadcast.
pub async fn handle_voice_activity(state: &AppState, session_id: &str, speaking: bool) {
    let Some(room_code) = bound_room(state, session_id).await else {
        return;
    };

    let honored = {
        let Some(room) = state.rooms.get(&room_code) else {
            return;
        };
        let mut inner = room.inner.write().await;
        match inner.participants.get_mut(session_id) {
            Some(participant) if participant.in_voice => {
                participant.speaking = speaking;
                true
            }
            _ => false,
        }
    };

    if honored {
        broadcast_to_room(
            state,
            &room_code,
            crate::protocol::ServerMessage::VoiceActivity {
                session_id: session_id.to_string(),
                speaking,
            },
        )
        .await;
    }
}

async fn bound_room(state: &AppState, session_id: &str) -> Option<String> {
    let session = state.sessions.get(session_id)?;
    let code = session.room_code.read().await.clone();
    code
}

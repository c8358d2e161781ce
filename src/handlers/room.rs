//! Room membership handlers and presence broadcasting.

use crate::error::ClientError;
use crate::protocol::{RoomUser, ServerMessage};
use crate::state::{normalize_room_code, sanitize_name, AppState, Participant};

/// Join a room, implicitly leaving the current one first.
pub async fn handle_join(state: &AppState, session_id: &str, room_code: &str, name: &str) {
    let code = normalize_room_code(room_code);
    let name = sanitize_name(name);

    if code.is_empty() || name.is_empty() {
        send_join_ack(state, session_id, Err(ClientError::InvalidInput));
        return;
    }

    // A bound session moves rooms by leaving the old one first. The previous
    // room's members get their departure notifications before the new room
    // sees the join.
    let previous = take_binding(state, session_id).await;
    if let Some(previous) = previous {
        remove_from_room(state, session_id, &previous).await;
    }

    let history = {
        let Some(room) = state.rooms.get(&code) else {
            send_join_ack(state, session_id, Err(ClientError::RoomNotFound));
            return;
        };
        let mut inner = room.inner.write().await;
        inner
            .participants
            .insert(session_id.to_string(), Participant::new(name.clone()));
        inner.messages.iter().cloned().collect::<Vec<_>>()
    };

    match state.sessions.get(session_id) {
        Some(session) => {
            *session.room_code.write().await = Some(code.clone());
            let _ = session.sender.send(ServerMessage::RoomHistory(history));
        }
        None => {
            // The connection dropped mid-join; undo the insert so the room
            // cannot be kept alive by a participant nobody can reach.
            remove_from_room(state, session_id, &code).await;
            return;
        }
    }

    send_join_ack(state, session_id, Ok(&code));
    broadcast_room_users(state, &code).await;

    tracing::info!(session_id = %session_id, room_code = %code, name = %name, "User joined room");
}

/// Explicit leave. Echoes `leftRoom` back to the leaver; no-op when unbound.
pub async fn handle_leave(state: &AppState, session_id: &str) {
    let room_code = take_binding(state, session_id).await;
    if let Some(room_code) = room_code {
        remove_from_room(state, session_id, &room_code).await;
        send_to_session(
            state,
            session_id,
            ServerMessage::LeftRoom {
                room_code: room_code.clone(),
            },
        );
    }
}

/// Room-side departure cleanup, shared by explicit leave, implicit leave on
/// re-join, and disconnect. Idempotent: an already-removed participant
/// changes nothing.
///
/// An emptied room is destroyed before this returns; otherwise the remaining
/// members get `userLeft` followed by the updated presence list.
pub async fn remove_from_room(state: &AppState, session_id: &str, room_code: &str) {
    let remaining = {
        let Some(room) = state.rooms.get(room_code) else {
            return;
        };
        let mut inner = room.inner.write().await;
        inner.participants.remove(session_id);
        inner.participants.len()
    };

    if remaining == 0 {
        state.destroy_if_empty(room_code);
    } else {
        broadcast_to_room(
            state,
            room_code,
            ServerMessage::UserLeft {
                session_id: session_id.to_string(),
            },
        )
        .await;
        broadcast_room_users(state, room_code).await;
    }

    tracing::info!(
        session_id = %session_id,
        room_code = %room_code,
        remaining = remaining,
        "User left room"
    );
}

/// Push the full current participant list to every member of the room.
pub async fn broadcast_room_users(state: &AppState, room_code: &str) {
    if let Some(room) = state.rooms.get(room_code) {
        let inner = room.inner.read().await;
        let users: Vec<RoomUser> = inner
            .participants
            .iter()
            .map(|(id, p)| RoomUser {
                id: id.clone(),
                name: p.name.clone(),
                in_voice: p.in_voice,
                speaking: p.speaking,
            })
            .collect();
        for id in inner.participants.keys() {
            if let Some(session) = state.sessions.get(id) {
                let _ = session.sender.send(ServerMessage::RoomUsers(users.clone()));
            }
        }
    }
}

/// Send a message to every member of the room.
pub async fn broadcast_to_room(state: &AppState, room_code: &str, message: ServerMessage) {
    if let Some(room) = state.rooms.get(room_code) {
        let inner = room.inner.read().await;
        for id in inner.participants.keys() {
            if let Some(session) = state.sessions.get(id) {
                let _ = session.sender.send(message.clone());
            }
        }
    }
}

pub fn send_to_session(state: &AppState, session_id: &str, message: ServerMessage) {
    if let Some(session) = state.sessions.get(session_id) {
        let _ = session.sender.send(message);
    }
}

/// Clear and return the session's room binding, if any.
async fn take_binding(state: &AppState, session_id: &str) -> Option<String> {
    let session = state.sessions.get(session_id)?;
    let taken = session.room_code.write().await.take();
    taken
}

fn send_join_ack(state: &AppState, session_id: &str, result: Result<&str, ClientError>) {
    let ack = match result {
        Ok(code) => ServerMessage::JoinAck {
            ok: true,
            room_code: Some(code.to_string()),
            error: None,
        },
        Err(err) => {
            tracing::debug!(session_id = %session_id, error = err.code(), "Join rejected");
            ServerMessage::JoinAck {
                ok: false,
                room_code: None,
                error: Some(err.code().to_string()),
            }
        }
    };
    send_to_session(state, session_id, ack);
}

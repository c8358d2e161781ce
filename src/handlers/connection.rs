//! Connection lifecycle handlers.

use crate::protocol::ServerMessage;
use crate::state::{AppState, Session};
use std::time::Instant;
use tokio::sync::{mpsc::UnboundedSender, RwLock};
use uuid::Uuid;

/// Register a new connection and hand its session id back to the socket loop.
pub async fn handle_connection(
    state: &AppState,
    sender: UnboundedSender<ServerMessage>,
) -> String {
    let session_id = Uuid::new_v4().to_string();

    let session = Session {
        room_code: RwLock::new(None),
        sender: sender.clone(),
        connected_at: Instant::now(),
    };

    state.sessions.insert(session_id.clone(), session);

    let _ = sender.send(ServerMessage::Session {
        session_id: session_id.clone(),
    });

    tracing::info!(session_id = %session_id, "New connection established");
    session_id
}

/// Tear down a dropped connection.
///
/// Removing the session entry first makes the cleanup exactly-once: a racing
/// duplicate finds nothing to remove. Room-side cleanup is the same routine
/// an explicit leave runs.
pub async fn handle_disconnect(state: &AppState, session_id: &str) {
    if let Some((_, session)) = state.sessions.remove(session_id) {
        let room_code = session.room_code.write().await.take();
        if let Some(room_code) = room_code {
            crate::handlers::room::remove_from_room(state, session_id, &room_code).await;
        }
        tracing::info!(session_id = %session_id, "Connection closed");
    }
}

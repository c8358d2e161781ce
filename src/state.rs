//! Application state: room registry, per-room state, session table.

use crate::config::Config;
use crate::protocol::{Message, ServerMessage};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc::UnboundedSender, RwLock};

pub const ROOM_CODE_LENGTH: usize = 6;
/// Code alphabet, excluding visually ambiguous characters (I, L, O, 0, 1).
pub const ROOM_CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const MAX_MESSAGES_PER_ROOM: usize = 200;
pub const MAX_NAME_LENGTH: usize = 32;

/// Global application state.
pub struct AppState {
    /// Live rooms (room code -> Room).
    pub rooms: DashMap<String, Room>,
    /// Connected sessions (session id -> Session).
    pub sessions: DashMap<String, Session>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            rooms: DashMap::new(),
            sessions: DashMap::new(),
            config: Arc::new(config),
        }
    }

    /// Create an empty room under a freshly generated, collision-free code.
    ///
    /// Codes of live rooms are never reused; the entry API makes the
    /// collision check and the insertion atomic.
    pub fn create_room(&self) -> String {
        loop {
            let code = generate_room_code();
            match self.rooms.entry(code.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(Room::new());
                    tracing::info!(room_code = %code, "Room created");
                    return code;
                }
            }
        }
    }

    /// Remove the room iff it has no participants. Idempotent.
    ///
    /// The emptiness re-check runs under the map guard, so a join that
    /// re-populated the room in the meantime keeps it alive.
    pub fn destroy_if_empty(&self, code: &str) {
        let removed = self
            .rooms
            .remove_if(code, |_, room| {
                room.inner
                    .try_read()
                    .map_or(false, |inner| inner.participants.is_empty())
            })
            .is_some();
        if removed {
            tracing::info!(room_code = %code, "Room destroyed");
        }
    }
}

/// One live room. The inner lock is the room's serialization domain: all
/// membership, voice, and history mutations happen under it.
pub struct Room {
    #[allow(dead_code)]
    pub created_at: Instant,
    pub inner: RwLock<RoomInner>,
}

impl Room {
    pub fn new() -> Self {
        Self {
            created_at: Instant::now(),
            inner: RwLock::new(RoomInner::default()),
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct RoomInner {
    pub participants: HashMap<String, Participant>,
    pub messages: VecDeque<Message>,
}

impl RoomInner {
    /// Append a message, evicting the oldest once the history cap is hit.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push_back(message);
        if self.messages.len() > MAX_MESSAGES_PER_ROOM {
            self.messages.pop_front();
        }
    }
}

/// A session's membership record within a room.
#[derive(Debug, Clone)]
pub struct Participant {
    pub name: String,
    pub in_voice: bool,
    pub speaking: bool,
}

impl Participant {
    pub fn new(name: String) -> Self {
        Self {
            name,
            in_voice: false,
            speaking: false,
        }
    }
}

/// Per-connection session record.
pub struct Session {
    /// The room this session is currently bound to, if any.
    pub room_code: RwLock<Option<String>>,
    pub sender: UnboundedSender<ServerMessage>,
    #[allow(dead_code)]
    pub connected_at: Instant,
}

pub fn generate_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_CODE_CHARS[rng.gen_range(0..ROOM_CODE_CHARS.len())] as char)
        .collect()
}

/// Uppercase, strip everything outside A-Z0-9, truncate to the code length.
pub fn normalize_room_code(raw: &str) -> String {
    raw.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .take(ROOM_CODE_LENGTH)
        .collect()
}

/// Trim surrounding whitespace and truncate to the name length cap.
pub fn sanitize_name(raw: &str) -> String {
    raw.trim().chars().take(MAX_NAME_LENGTH).collect()
}

//! Client-facing error taxonomy.

use thiserror::Error;

/// Errors reported back to the originating connection through an ack.
///
/// None of these are fatal; they never affect other connections or rooms.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClientError {
    #[error("room code or name is empty or malformed")]
    InvalidInput,
    #[error("no live room with that code")]
    RoomNotFound,
    #[error("action requires room membership")]
    NotBound,
}

impl ClientError {
    /// Stable wire code carried in ack payloads.
    pub fn code(self) -> &'static str {
        match self {
            ClientError::InvalidInput => "INVALID_INPUT",
            ClientError::RoomNotFound => "ROOM_NOT_FOUND",
            ClientError::NotBound => "NOT_BOUND",
        }
    }
}

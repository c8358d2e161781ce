//! Roomcast: ephemeral room chat and WebRTC voice-signaling server.
//!
//! Rooms are created on demand, identified by short human-typable codes, and
//! destroyed the moment their last participant leaves. The server relays text
//! chat with bounded history and forwards offer/answer/candidate messages
//! between participants who have both opted into voice; media never touches
//! this process.

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod state;

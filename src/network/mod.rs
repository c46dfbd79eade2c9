//! Network Layer
//!
//! WebSocket client plumbing for the game server connection.
//! This layer is **non-deterministic** - all decision logic runs through
//! `game/`.

pub mod protocol;
pub mod session;
pub mod client;

pub use protocol::{ClientMessage, ServerMessage, JoinRequest};
pub use session::{BotSession, SessionConfig, GHOST_RALLY};
pub use client::{run, ClientError};

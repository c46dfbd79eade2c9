//! # Bomber Agent
//!
//! Autonomous player agent for a tick-driven, grid-based bombing game.
//! Connects to the game server over WebSocket, reconstructs the match
//! state from snapshots and deltas, and answers every state message with
//! exactly one control action.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        BOMBER AGENT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Grid primitives                           │
//! │  └── grid.rs     - Cells, continuous positions, directions   │
//! │                                                              │
//! │  game/           - Decision engine (deterministic)           │
//! │  ├── world.rs    - World model from snapshots and deltas     │
//! │  ├── hazard.rs   - Danger cells from active bombs            │
//! │  ├── path.rs     - Bounded BFS escape routing                │
//! │  └── policy.rs   - Priority cascade action selection         │
//! │                                                              │
//! │  network/        - Networking (non-deterministic)            │
//! │  ├── protocol.rs - Message types                             │
//! │  ├── session.rs  - Message-in, action-out session logic      │
//! │  └── client.rs   - WebSocket transport loop                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No HashMap (uses BTreeMap/BTreeSet for sorted iteration)
//! - No system time dependencies
//! - Fixed up/down/left/right tie-break everywhere a choice is ranked
//!
//! Given the same message sequence, the agent produces the **identical
//! action sequence** every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use core::grid::{Direction, GridPos, Position};
pub use game::policy::{Action, ActionPolicy};
pub use game::world::WorldModel;
pub use network::session::{BotSession, SessionConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Decision Engine
//!
//! Everything between a decoded server message and a chosen action.
//! 100% deterministic: the same message sequence always yields the same
//! action sequence.
//!
//! ## Module Structure
//!
//! - `world`: Authoritative world model reconstructed from server messages
//! - `hazard`: Per-tick danger cell derivation from active bombs
//! - `path`: Bounded breadth-first escape-route search
//! - `policy`: Priority cascade selecting one action per tick

pub mod world;
pub mod hazard;
pub mod path;
pub mod policy;

// Re-export key types
pub use world::{WorldModel, GameMap, Tile, PlayerState, PlayerStatus, Bomb, Item};
pub use policy::{Action, ActionPolicy, PolicyError};

//! Core grid primitives.
//!
//! Shared coordinate types used by both the game model and the wire
//! protocol. Everything here is plain data with no I/O.

pub mod grid;

// Re-export core types
pub use grid::{Direction, GridPos, Position};

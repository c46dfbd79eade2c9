//! Action Policy
//!
//! Turns the current world model into exactly one action per state
//! message, via a fixed priority cascade:
//!
//! 1. Stuck break-out: bomb free of a jam when position has not changed
//!    for several ticks.
//! 2. Proactive bombing: bomb when safe, worthwhile, and escapable.
//! 3. Danger escape: move along the best escape route.
//! 4. Fallback bombing: re-try the bombing opportunity when no escape
//!    route was found.
//! 5. Optimal exploratory move: best-scored safe neighbor, never
//!    reversing the previous move unless forced.
//! 6. Fallback safe move, defaulting to moving up.
//!
//! Bombing is gated everywhere: never beyond the bomb limit and never
//! without an escape route from the current cell. The escape check runs
//! against the current danger set rather than a simulated post-placement
//! set; preserved as-is until the real game semantics are confirmed.

use std::collections::BTreeSet;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::core::grid::{Direction, GridPos, Position};
use crate::game::hazard;
use crate::game::path::best_escape_route;
use crate::game::world::{PlayerState, WorldModel};

/// Consecutive no-movement ticks before the stuck break-out fires.
pub const STUCK_THRESHOLD: u32 = 3;

/// Manhattan radius within which a living enemy justifies a bomb.
pub const ENEMY_BOMB_RANGE: f64 = 2.0;

// =============================================================================
// ACTION
// =============================================================================

/// One discrete action per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Move one step in a direction.
    Move(Direction),
    /// Place a bomb on the current cell.
    PlaceBomb,
}

impl Action {
    /// Single-letter wire encoding (`u`/`d`/`l`/`r`/`b`).
    pub const fn wire_letter(self) -> &'static str {
        match self {
            Action::Move(dir) => dir.wire_letter(),
            Action::PlaceBomb => "b",
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_letter())
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// Decision faults surfaced to the session entry point, where they
/// suppress the tick's action instead of failing the session.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The controlled player is missing from the roster.
    #[error("controlled player {0} not found in roster")]
    PlayerNotFound(String),
}

/// Per-session decision state: the controlled player's id plus the three
/// counters that persist across ticks.
#[derive(Clone, Debug)]
pub struct ActionPolicy {
    player_id: String,
    last_position: Option<Position>,
    stuck_counter: u32,
    last_move: Option<Direction>,
}

impl ActionPolicy {
    /// Create a policy controlling the player with `player_id`.
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            last_position: None,
            stuck_counter: 0,
            last_move: None,
        }
    }

    /// Select one action for the current world state.
    pub fn decide(&mut self, world: &WorldModel) -> Result<Action, PolicyError> {
        let me = world
            .player(&self.player_id)
            .ok_or_else(|| PolicyError::PlayerNotFound(self.player_id.clone()))?
            .clone();

        self.track_stuck(me.position);

        let cell = me.position.cell();
        let danger = hazard::danger_cells(&world.bombs);
        let in_danger = hazard::is_in_danger(me.position, &danger);
        let can_bomb = me.bombs_placed < me.bomb_limit;

        // 1. Stuck break-out.
        if self.stuck_counter >= STUCK_THRESHOLD
            && can_bomb
            && best_escape_route(cell, &danger, world).is_some()
        {
            debug!(ticks = self.stuck_counter, "stuck, bombing out");
            return Ok(Action::PlaceBomb);
        }

        // 2. Proactive bombing.
        if !in_danger && can_bomb && good_time_to_bomb(&me, &danger, world) {
            if let Some(escape) = best_escape_route(cell, &danger, world) {
                debug!(%escape, "placing bomb");
                return Ok(Action::PlaceBomb);
            }
        }

        // 3. Danger escape.
        if in_danger {
            if let Some(dir) = best_escape_route(cell, &danger, world) {
                self.last_move = Some(dir);
                return Ok(Action::Move(dir));
            }
        }

        // 4. Fallback bombing.
        if can_bomb
            && good_time_to_bomb(&me, &danger, world)
            && best_escape_route(cell, &danger, world).is_some()
        {
            return Ok(Action::PlaceBomb);
        }

        // 5. Optimal exploratory move.
        if let Some(dir) = self.optimal_move(cell, &danger, world) {
            self.last_move = Some(dir);
            return Ok(Action::Move(dir));
        }

        // 6. Fallback safe move.
        Ok(Action::Move(
            fallback_safe_move(cell, &danger, world).unwrap_or(Direction::Up),
        ))
    }

    /// Update the stuck counter from the current position. Resets on any
    /// cell change.
    fn track_stuck(&mut self, position: Position) {
        if let Some(last) = self.last_position {
            if last.cell() == position.cell() {
                self.stuck_counter += 1;
            } else {
                self.stuck_counter = 0;
            }
        }
        self.last_position = Some(position);
    }

    /// Best-scored valid, non-dangerous neighbor; the reverse of the
    /// previous move is excluded unless it is the only option.
    fn optimal_move(
        &self,
        cell: GridPos,
        danger: &BTreeSet<GridPos>,
        world: &WorldModel,
    ) -> Option<Direction> {
        let mut moves: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&dir| {
                let next = cell.step(dir);
                world.is_traversable(next) && !danger.contains(&next)
            })
            .collect();

        if let Some(last) = self.last_move {
            let reverse = last.opposite();
            if moves.iter().any(|&dir| dir != reverse) {
                moves.retain(|&dir| dir != reverse);
            }
        }

        let mut best: Option<(f64, Direction)> = None;
        for dir in moves {
            let score = evaluate_position(cell.step(dir), world);
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, dir));
            }
        }
        best.map(|(_, dir)| dir)
    }
}

/// Whether this is a good moment to place a bomb: an escape route must
/// exist, and there must be a destructible brick next to the player or a
/// living enemy within close range.
fn good_time_to_bomb(me: &PlayerState, danger: &BTreeSet<GridPos>, world: &WorldModel) -> bool {
    let cell = me.position.cell();
    if best_escape_route(cell, danger, world).is_none() {
        return false;
    }

    let adjacent_bricks = world
        .map
        .as_ref()
        .map_or(0, |map| {
            cell.neighbors()
                .iter()
                .filter(|&&n| map.is_brick(n))
                .count()
        });
    if adjacent_bricks > 0 {
        debug!(count = adjacent_bricks, "bricks in bomb range");
        return true;
    }

    world
        .nearest_enemy(me)
        .is_some_and(|enemy| me.position.manhattan(enemy.position) <= ENEMY_BOMB_RANGE)
}

/// Exploration heuristic: attraction toward the nearest brick and item,
/// plus a bonus for keeping exits open.
fn evaluate_position(cell: GridPos, world: &WorldModel) -> f64 {
    let mut score = 0.0;

    if let Some(brick) = world.map.as_ref().and_then(|map| map.nearest_brick(cell)) {
        score += 10.0 / (1.0 + f64::from(cell.manhattan(brick)));
    }
    if let Some(item) = world.nearest_item(cell) {
        score += 15.0 / (1.0 + f64::from(cell.manhattan(item.position)));
    }

    score + 2.0 * world.free_neighbor_count(cell) as f64
}

/// Last-resort move: any open, non-dangerous neighbor, preferring the one
/// with the most open neighbors of its own.
fn fallback_safe_move(
    cell: GridPos,
    danger: &BTreeSet<GridPos>,
    world: &WorldModel,
) -> Option<Direction> {
    let mut best: Option<(usize, Direction)> = None;
    for dir in Direction::ALL {
        let next = cell.step(dir);
        if !world.is_open(next) || danger.contains(&next) {
            continue;
        }
        let exits = world.free_neighbor_count(next);
        if best.is_none_or(|(best_exits, _)| exits > best_exits) {
            best = Some((exits, dir));
        }
    }
    best.map(|(_, dir)| dir)
}

// =============================================================================
// TESTS
// =============================================================================

//! Escape Pathfinding
//!
//! Bounded breadth-first search over traversable cells for the first step
//! of the best escape route out of the current danger zone.
//!
//! The expansion order (up, down, left, right) is the tie-break for
//! equally scored destinations and is load-bearing for deterministic
//! behavior; do not reorder it.

use std::collections::{BTreeSet, VecDeque};

use crate::core::grid::{Direction, GridPos};
use crate::game::world::WorldModel;

/// Maximum search depth for escape routes.
pub const ESCAPE_SEARCH_DEPTH: u32 = 8;

/// Penalty applied to candidate cells adjacent to a wall.
const WALL_ADJACENCY_PENALTY: f64 = 5.0;

/// Weight per open neighbor of a candidate cell.
const OPEN_NEIGHBOR_WEIGHT: f64 = 3.0;

struct SearchNode {
    cell: GridPos,
    first_step: Option<Direction>,
    depth: u32,
}

/// Find the first step of the best escape route from `start`.
///
/// Explores traversable cells (in bounds, no wall, no brick, no bomb) up
/// to [`ESCAPE_SEARCH_DEPTH`]. Every reached cell outside `danger` is a
/// candidate ranked by [`safety_score`]; the search continues to the depth
/// bound rather than stopping at the first safe cell. The start cell is
/// never a candidate: a route must move. Returns `None` when no reachable
/// safe cell exists within the bound.
pub fn best_escape_route(
    start: GridPos,
    danger: &BTreeSet<GridPos>,
    world: &WorldModel,
) -> Option<Direction> {
    let mut visited: BTreeSet<GridPos> = BTreeSet::new();
    let mut queue: VecDeque<SearchNode> = VecDeque::new();
    queue.push_back(SearchNode {
        cell: start,
        first_step: None,
        depth: 0,
    });

    let mut best: Option<(f64, Direction)> = None;

    while let Some(node) = queue.pop_front() {
        if !danger.contains(&node.cell) {
            if let Some(step) = node.first_step {
                let score = safety_score(node.cell, world);
                // Strict comparison keeps the earliest candidate on ties,
                // which preserves the up/down/left/right tie-break.
                if best.is_none_or(|(best_score, _)| score > best_score) {
                    best = Some((score, step));
                }
            }
        }

        if visited.contains(&node.cell) || node.depth >= ESCAPE_SEARCH_DEPTH {
            continue;
        }
        visited.insert(node.cell);

        for dir in Direction::ALL {
            let next = node.cell.step(dir);
            if world.is_traversable(next) {
                queue.push_back(SearchNode {
                    cell: next,
                    first_step: node.first_step.or(Some(dir)),
                    depth: node.depth + 1,
                });
            }
        }
    }

    best.map(|(_, step)| step)
}

/// Safety score of a candidate destination.
///
/// Sum of Manhattan distances to every bomb, minus a penalty when the
/// cell touches a wall, plus a bonus per open neighboring cell.
pub fn safety_score(cell: GridPos, world: &WorldModel) -> f64 {
    let mut score: f64 = world
        .bombs
        .iter()
        .map(|bomb| f64::from(cell.manhattan(bomb.position)))
        .sum();

    if world.is_near_wall(cell) {
        score -= WALL_ADJACENCY_PENALTY;
    }

    score += OPEN_NEIGHBOR_WEIGHT * world.free_neighbor_count(cell) as f64;
    score
}

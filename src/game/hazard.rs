//! Hazard Map
//!
//! Derives, from the current bomb list, the set of grid cells considered
//! dangerous this tick. Stateless: recomputed from scratch on every call.
//!
//! The blast footprint is a plain "+" shape extending the bomb's full
//! power in each axis direction. It deliberately does not stop the ray at
//! walls or bricks; the real game's propagation rule may differ, so this
//! over-approximates the danger zone.

use std::collections::BTreeSet;

use crate::core::grid::{Direction, GridPos, Position};
use crate::game::world::Bomb;

/// Compute the set of dangerous cells for the given bombs.
///
/// Every bomb's own cell is dangerous, plus each cell at distance
/// `1..=power` along the four axis directions.
pub fn danger_cells(bombs: &[Bomb]) -> BTreeSet<GridPos> {
    let mut cells = BTreeSet::new();
    for bomb in bombs {
        cells.insert(bomb.position);
        let power = bomb.power.max(1) as i32;
        for dist in 1..=power {
            for dir in Direction::ALL {
                let (dx, dy) = dir.offset();
                cells.insert(GridPos::new(
                    bomb.position.x + dx * dist,
                    bomb.position.y + dy * dist,
                ));
            }
        }
    }
    cells
}

/// Whether the cell containing `position` is dangerous.
pub fn is_in_danger(position: Position, cells: &BTreeSet<GridPos>) -> bool {
    cells.contains(&position.cell())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bomb(x: i32, y: i32, power: u32) -> Bomb {
        Bomb {
            id: format!("bomb-{x}-{y}"),
            owner_id: None,
            position: GridPos::new(x, y),
            countdown_ticks: 30,
            power,
            is_exploding_soon: false,
            is_moving: false,
            kicker_id: None,
            move_direction: None,
            move_distance_left: None,
        }
    }

    #[test]
    fn test_power_two_plus_footprint() {
        let cells = danger_cells(&[bomb(5, 5, 2)]);

        let expected: BTreeSet<GridPos> = [
            (5, 5),
            (5, 3),
            (5, 4),
            (5, 6),
            (5, 7),
            (3, 5),
            (4, 5),
            (6, 5),
            (7, 5),
        ]
        .into_iter()
        .map(|(x, y)| GridPos::new(x, y))
        .collect();

        assert_eq!(cells, expected);
        assert!(!cells.contains(&GridPos::new(4, 4)));
        assert!(!cells.contains(&GridPos::new(6, 6)));
    }

    #[test]
    fn test_no_bombs_no_danger() {
        assert!(danger_cells(&[]).is_empty());
    }

    #[test]
    fn test_overlapping_footprints_merge() {
        let cells = danger_cells(&[bomb(2, 2, 1), bomb(3, 2, 1)]);
        // (2,2) and (3,2) appear once each plus their arms.
        assert!(cells.contains(&GridPos::new(1, 2)));
        assert!(cells.contains(&GridPos::new(4, 2)));
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn test_in_danger_floors_position() {
        let cells = danger_cells(&[bomb(5, 5, 1)]);
        assert!(is_in_danger(Position::new(5.9, 5.2), &cells));
        assert!(is_in_danger(Position::new(5.0, 4.7), &cells));
        assert!(!is_in_danger(Position::new(4.9, 4.9), &cells));
    }

    proptest! {
        /// Every dangerous cell lies on an axis through the bomb, within
        /// its power, and the footprint has exactly 1 + 4 * power cells.
        #[test]
        fn prop_footprint_shape(x in -50i32..50, y in -50i32..50, power in 1u32..6) {
            let center = GridPos::new(x, y);
            let cells = danger_cells(&[bomb(x, y, power)]);

            prop_assert_eq!(cells.len(), 1 + 4 * power as usize);
            for cell in &cells {
                prop_assert!(cell.x == x || cell.y == y);
                prop_assert!(center.manhattan(*cell) <= power as i32);
            }
        }
    }
}

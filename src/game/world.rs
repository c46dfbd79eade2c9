//! World Model
//!
//! Authoritative view of the match as reconstructed from server messages:
//! the tile map, the player roster, and the bomb and item lists.
//!
//! Two update paths exist. A full snapshot (`initial_state`) resets
//! everything. A delta (`tick_delta`) patches players field-by-field,
//! applies destroyed-brick events, and wholly replaces the bomb and item
//! lists when they are present.
//!
//! Uses BTreeMap for deterministic roster iteration order.

use std::collections::BTreeMap;
use serde::Deserialize;
use tracing::debug;

use crate::core::grid::{Direction, GridPos, Position};

/// Wire positions for players are fixed-point integers scaled by this factor.
pub const POSITION_SCALE: f64 = 100.0;

// =============================================================================
// TILES AND MAP
// =============================================================================

/// A single map tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tile {
    /// Walkable floor.
    #[default]
    Empty,
    /// Permanent wall. Never destroyed.
    Wall,
    /// Destructible brick. Transitions to `Empty` via a destroyed-brick
    /// event; the transition is one-way.
    Brick,
}

impl Tile {
    /// Decode the numeric wire encoding. Unknown values decode as `Wall`
    /// so that malformed map data degrades to blocked rather than open.
    pub const fn from_wire(value: u8) -> Self {
        match value {
            0 => Tile::Empty,
            2 => Tile::Brick,
            _ => Tile::Wall,
        }
    }
}

/// Fixed-size tile grid, established by the first snapshot.
#[derive(Clone, Debug, Default)]
pub struct GameMap {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    tiles: Vec<Vec<Tile>>,
}

impl GameMap {
    /// Build a map from its wire payload.
    pub fn from_payload(payload: &MapPayload) -> Self {
        let tiles = payload
            .tiles
            .iter()
            .map(|row| row.iter().map(|&v| Tile::from_wire(v)).collect())
            .collect();
        Self {
            width: payload.width,
            height: payload.height,
            tiles,
        }
    }

    /// The tile at `cell`, or `None` when out of bounds.
    pub fn tile(&self, cell: GridPos) -> Option<Tile> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        self.tiles
            .get(cell.y as usize)
            .and_then(|row| row.get(cell.x as usize))
            .copied()
    }

    /// Whether `cell` holds a permanent wall. Out-of-bounds cells are not
    /// walls (they are simply not part of the map).
    pub fn is_wall(&self, cell: GridPos) -> bool {
        self.tile(cell) == Some(Tile::Wall)
    }

    /// Whether `cell` holds a destructible brick.
    pub fn is_brick(&self, cell: GridPos) -> bool {
        self.tile(cell) == Some(Tile::Brick)
    }

    /// Whether `cell` is in bounds and holds neither wall nor brick.
    pub fn is_open(&self, cell: GridPos) -> bool {
        self.tile(cell) == Some(Tile::Empty)
    }

    /// Apply a destroyed-brick event. Out-of-bounds events are ignored.
    pub fn destroy_brick(&mut self, cell: GridPos) {
        if cell.x < 0 || cell.y < 0 {
            return;
        }
        if let Some(tile) = self
            .tiles
            .get_mut(cell.y as usize)
            .and_then(|row| row.get_mut(cell.x as usize))
        {
            *tile = Tile::Empty;
        }
    }

    /// The brick cell closest to `from` by Manhattan distance, scanning
    /// rows top to bottom. `None` when no brick remains.
    pub fn nearest_brick(&self, from: GridPos) -> Option<GridPos> {
        let mut nearest: Option<(i32, GridPos)> = None;
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                if tile != Tile::Brick {
                    continue;
                }
                let cell = GridPos::new(x as i32, y as i32);
                let dist = from.manhattan(cell);
                if nearest.is_none_or(|(best, _)| dist < best) {
                    nearest = Some((dist, cell));
                }
            }
        }
        nearest.map(|(_, cell)| cell)
    }
}

// =============================================================================
// PLAYERS
// =============================================================================

/// Life status of a player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// Participating normally.
    #[default]
    Alive,
    /// Eliminated; only ghost actions apply.
    Dead,
}

/// Last known state of one player.
///
/// Created from an empty baseline and filled in by presence patches; a
/// field never sent by the server keeps its default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerState {
    /// Unique, stable identifier. Primary key of the roster.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Facing direction.
    pub direction: Option<Direction>,
    /// Continuous position in grid units.
    pub position: Position,
    /// Alive or dead.
    pub status: PlayerStatus,
    /// Invincibility flag.
    pub is_invincible: bool,
    /// Remaining invincibility ticks.
    pub invincibility_ticks_left: u32,
    /// Movement speed in grid units per tick.
    pub speed: f64,
    /// Maximum bombs this player may have placed at once.
    pub bomb_limit: u32,
    /// Bombs currently placed.
    pub bombs_placed: u32,
    /// Blast power of this player's bombs.
    pub bomb_power: u32,
    /// Accumulated score.
    pub score: i64,
    /// Team identifier.
    pub team_id: Option<String>,
}

impl PlayerState {
    /// Merge a presence patch: only fields present in the payload
    /// overwrite the stored value.
    pub fn apply_patch(&mut self, patch: &PlayerPatch) {
        self.id = patch.id.clone();
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(direction) = patch.direction {
            self.direction = Some(direction);
        }
        if let Some(p) = &patch.position {
            self.position = Position::new(
                f64::from(p.x) / POSITION_SCALE,
                f64::from(p.y) / POSITION_SCALE,
            );
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(invincible) = patch.is_invincible {
            self.is_invincible = invincible;
        }
        if let Some(ticks) = patch.invincibility_ticks_left {
            self.invincibility_ticks_left = ticks;
        }
        if let Some(speed) = patch.speed {
            self.speed = speed;
        }
        if let Some(limit) = patch.bomb_limit {
            self.bomb_limit = limit;
        }
        if let Some(placed) = patch.bombs_placed {
            self.bombs_placed = placed;
        }
        if let Some(power) = patch.bomb_power {
            self.bomb_power = power;
        }
        if let Some(score) = patch.score {
            self.score = score;
        }
        if let Some(team) = &patch.team_id {
            self.team_id = Some(team.clone());
        }
    }
}

// =============================================================================
// BOMBS AND ITEMS
// =============================================================================

/// An active bomb on the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Bomb {
    /// Unique bomb identifier.
    pub id: String,
    /// Owning player's id.
    pub owner_id: Option<String>,
    /// Grid cell the bomb occupies.
    pub position: GridPos,
    /// Ticks until detonation.
    pub countdown_ticks: u32,
    /// Blast power (ray length per direction).
    pub power: u32,
    /// Server hint that detonation is imminent.
    pub is_exploding_soon: bool,
    /// Whether the bomb is sliding after a kick.
    pub is_moving: bool,
    /// Player who kicked it.
    pub kicker_id: Option<String>,
    /// Slide direction while moving.
    pub move_direction: Option<Direction>,
    /// Remaining slide distance in cells.
    pub move_distance_left: Option<i32>,
}

impl Bomb {
    /// Blast power assumed when the wire omits or zeroes the field.
    pub const DEFAULT_POWER: u32 = 2;

    /// Hydrate from the wire payload. Bomb positions arrive as raw grid
    /// integers with no scaling.
    pub fn from_payload(payload: &BombPayload) -> Self {
        Self {
            id: payload.id.clone(),
            owner_id: payload.owner_id.clone(),
            position: GridPos::new(payload.position.x, payload.position.y),
            countdown_ticks: payload.countdown_ticks.unwrap_or(0),
            power: payload
                .power
                .filter(|&p| p > 0)
                .unwrap_or(Self::DEFAULT_POWER),
            is_exploding_soon: payload.is_exploding_soon.unwrap_or(false),
            is_moving: payload.is_moving.unwrap_or(false),
            kicker_id: payload.kicker_id.clone(),
            move_direction: payload.move_direction,
            move_distance_left: payload.move_distance_left,
        }
    }
}

/// A collectible item on the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// Unique item identifier.
    pub id: String,
    /// Item type tag as transmitted.
    pub item_type: String,
    /// Grid cell the item occupies.
    pub position: GridPos,
}

impl Item {
    /// Hydrate from the wire payload.
    pub fn from_payload(payload: &ItemPayload) -> Self {
        Self {
            id: payload.id.clone(),
            item_type: payload.item_type.clone(),
            position: GridPos::new(payload.position.x, payload.position.y),
        }
    }
}

// =============================================================================
// WIRE PAYLOADS
// =============================================================================
// The server abbreviates field names on the wire; hydration into domain
// types happens here, next to the state they produce.

/// Raw integer coordinate pair as transmitted.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CoordPayload {
    /// X component.
    pub x: i32,
    /// Y component.
    pub y: i32,
}

/// Tile map section of a snapshot.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MapPayload {
    /// Grid width in cells.
    #[serde(default)]
    pub width: u32,
    /// Grid height in cells.
    #[serde(default)]
    pub height: u32,
    /// Row-major numeric tile grid.
    #[serde(default)]
    pub tiles: Vec<Vec<u8>>,
}

/// Sparse player payload. Every field but `id` is optional; absent fields
/// leave the stored value untouched.
#[derive(Clone, Debug, Deserialize)]
pub struct PlayerPatch {
    /// Player identifier (always present).
    pub id: String,
    /// Display name.
    #[serde(rename = "n")]
    pub name: Option<String>,
    /// Facing direction.
    #[serde(rename = "d")]
    pub direction: Option<Direction>,
    /// Position, scaled by [`POSITION_SCALE`].
    #[serde(rename = "p")]
    pub position: Option<CoordPayload>,
    /// Life status.
    #[serde(rename = "s")]
    pub status: Option<PlayerStatus>,
    /// Invincibility flag.
    #[serde(rename = "iv")]
    pub is_invincible: Option<bool>,
    /// Remaining invincibility ticks.
    #[serde(rename = "ivt")]
    pub invincibility_ticks_left: Option<u32>,
    /// Movement speed.
    #[serde(rename = "sp")]
    pub speed: Option<f64>,
    /// Bomb capacity limit.
    #[serde(rename = "bl")]
    pub bomb_limit: Option<u32>,
    /// Bombs currently placed.
    #[serde(rename = "bp")]
    pub bombs_placed: Option<u32>,
    /// Bomb blast power.
    #[serde(rename = "pow")]
    pub bomb_power: Option<u32>,
    /// Score.
    #[serde(rename = "sc")]
    pub score: Option<i64>,
    /// Team identifier.
    #[serde(rename = "tid")]
    pub team_id: Option<String>,
}

/// Bomb payload. Positions are raw grid integers.
#[derive(Clone, Debug, Deserialize)]
pub struct BombPayload {
    /// Bomb identifier.
    pub id: String,
    /// Owning player's id.
    #[serde(rename = "o")]
    pub owner_id: Option<String>,
    /// Grid position.
    #[serde(rename = "p")]
    pub position: CoordPayload,
    /// Ticks until detonation.
    #[serde(rename = "c")]
    pub countdown_ticks: Option<u32>,
    /// Blast power.
    #[serde(rename = "pow")]
    pub power: Option<u32>,
    /// Imminent-detonation hint.
    #[serde(rename = "es")]
    pub is_exploding_soon: Option<bool>,
    /// Sliding after a kick.
    #[serde(rename = "imv")]
    pub is_moving: Option<bool>,
    /// Kicking player's id.
    #[serde(rename = "kid")]
    pub kicker_id: Option<String>,
    /// Slide direction.
    #[serde(rename = "md")]
    pub move_direction: Option<Direction>,
    /// Remaining slide distance.
    #[serde(rename = "mdl")]
    pub move_distance_left: Option<i32>,
}

/// Item payload. Positions are raw grid integers.
#[derive(Clone, Debug, Deserialize)]
pub struct ItemPayload {
    /// Item identifier.
    pub id: String,
    /// Item type tag.
    #[serde(rename = "t")]
    pub item_type: String,
    /// Grid position.
    #[serde(rename = "p")]
    pub position: CoordPayload,
}

/// Body of an `initial_state` message. Every section is optional so a
/// malformed snapshot degrades to empty state instead of failing the tick.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Snapshot {
    /// Tile map.
    pub map: Option<MapPayload>,
    /// Full player roster.
    #[serde(default)]
    pub players: Vec<PlayerPatch>,
    /// Active bombs.
    #[serde(default)]
    pub bombs: Vec<BombPayload>,
    /// Items on the ground.
    #[serde(default)]
    pub items: Vec<ItemPayload>,
}

/// Body of a `tick_delta` message. Bomb and item lists are full
/// replacements when present; absent lists leave prior state untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TickDelta {
    /// Bricks destroyed since the last message.
    #[serde(rename = "destroyedBricks", default)]
    pub destroyed_bricks: Vec<CoordPayload>,
    /// Sparse player patches.
    #[serde(default)]
    pub players: Vec<PlayerPatch>,
    /// Full replacement bomb list.
    pub bombs: Option<Vec<BombPayload>>,
    /// Full replacement item list.
    pub items: Option<Vec<ItemPayload>>,
}

// =============================================================================
// WORLD MODEL
// =============================================================================

/// The agent's authoritative view of the match.
#[derive(Clone, Debug, Default)]
pub struct WorldModel {
    /// Tile map, set by the first snapshot.
    pub map: Option<GameMap>,
    /// Player roster keyed by id.
    pub players: BTreeMap<String, PlayerState>,
    /// Active bombs, wholly replaced by deltas that carry them.
    pub bombs: Vec<Bomb>,
    /// Ground items, wholly replaced by deltas that carry them.
    pub items: Vec<Item>,
}

impl WorldModel {
    /// Create an empty world. Populated wholesale by the first snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all state from a full snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        self.map = snapshot.map.as_ref().map(GameMap::from_payload);
        if let Some(map) = &self.map {
            debug!("initial map size: {}x{}", map.width, map.height);
        }

        self.players.clear();
        for patch in &snapshot.players {
            let mut player = PlayerState::default();
            player.apply_patch(patch);
            self.players.insert(patch.id.clone(), player);
        }

        self.bombs = snapshot.bombs.iter().map(Bomb::from_payload).collect();
        self.items = snapshot.items.iter().map(Item::from_payload).collect();

        debug!(
            players = self.players.len(),
            bombs = self.bombs.len(),
            items = self.items.len(),
            "snapshot applied"
        );
    }

    /// Apply an incremental delta.
    pub fn apply_delta(&mut self, delta: &TickDelta) {
        if let Some(map) = &mut self.map {
            for brick in &delta.destroyed_bricks {
                map.destroy_brick(GridPos::new(brick.x, brick.y));
            }
        }

        for patch in &delta.players {
            self.players
                .entry(patch.id.clone())
                .or_default()
                .apply_patch(patch);
        }

        if let Some(bombs) = &delta.bombs {
            self.bombs = bombs.iter().map(Bomb::from_payload).collect();
        }
        if let Some(items) = &delta.items {
            self.items = items.iter().map(Item::from_payload).collect();
        }
    }

    /// Look up a player by id.
    pub fn player(&self, id: &str) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// Whether a bomb occupies `cell`.
    pub fn bomb_at(&self, cell: GridPos) -> bool {
        self.bombs.iter().any(|bomb| bomb.position == cell)
    }

    /// Whether `cell` is in bounds and holds neither wall nor brick.
    /// A missing map means every cell is blocked.
    pub fn is_open(&self, cell: GridPos) -> bool {
        self.map.as_ref().is_some_and(|map| map.is_open(cell))
    }

    /// Whether `cell` can be walked onto: open tile and no bomb on it.
    pub fn is_traversable(&self, cell: GridPos) -> bool {
        self.is_open(cell) && !self.bomb_at(cell)
    }

    /// Count of open cells among the four neighbors of `cell`.
    pub fn free_neighbor_count(&self, cell: GridPos) -> usize {
        cell.neighbors()
            .iter()
            .filter(|&&n| self.is_open(n))
            .count()
    }

    /// Whether any of the four neighbors of `cell` is a permanent wall.
    pub fn is_near_wall(&self, cell: GridPos) -> bool {
        let Some(map) = &self.map else { return false };
        cell.neighbors().iter().any(|&n| map.is_wall(n))
    }

    /// The item closest to `from` by Manhattan distance. Ties keep the
    /// earlier entry in the list.
    pub fn nearest_item(&self, from: GridPos) -> Option<&Item> {
        let mut nearest: Option<(i32, &Item)> = None;
        for item in &self.items {
            let dist = from.manhattan(item.position);
            if nearest.is_none_or(|(best, _)| dist < best) {
                nearest = Some((dist, item));
            }
        }
        nearest.map(|(_, item)| item)
    }

    /// The living enemy (different team, not `me`) nearest to `me` by
    /// Manhattan distance over continuous positions.
    pub fn nearest_enemy(&self, me: &PlayerState) -> Option<&PlayerState> {
        let mut nearest: Option<(f64, &PlayerState)> = None;
        for player in self.players.values() {
            if player.id == me.id
                || player.team_id == me.team_id
                || player.status == PlayerStatus::Dead
            {
                continue;
            }
            let dist = me.position.manhattan(player.position);
            if nearest.as_ref().is_none_or(|(best, _)| dist < *best) {
                nearest = Some((dist, player));
            }
        }
        nearest.map(|(_, player)| player)
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Protocol Messages
//!
//! Wire format for the WebSocket link to the game server. All messages
//! are JSON objects tagged by a snake_case `type` field.
//!
//! Inbound state payloads (snapshots, deltas) live in `game::world` next
//! to the hydration code; this module wraps them in the message envelope
//! and defines everything the agent sends.

use serde::{Serialize, Deserialize};

use crate::core::grid::GridPos;
use crate::game::policy::Action;
use crate::game::world::{Snapshot, TickDelta};

// =============================================================================
// SERVER -> AGENT MESSAGES
// =============================================================================

/// Messages received from the server.
///
/// The `Unknown` catch-all absorbs message types this agent does not
/// handle, so protocol additions never fail decoding.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full state reset at join time.
    InitialState(Snapshot),

    /// Incremental per-tick update.
    TickDelta(TickDelta),

    /// The join request was accepted.
    JoinSuccess,

    /// The match has ended.
    GameOver {
        /// Winning player, absent on a draw.
        #[serde(rename = "winnerId", default)]
        winner_id: Option<String>,
    },

    /// Bare tick pulse with no payload.
    Tick,

    /// A bomb was placed somewhere on the grid.
    BombPlaced,

    /// A bomb is about to detonate.
    BombExplodingSoon,

    /// A player died.
    PlayerDied,

    /// Any message type this agent does not know.
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Deserialize from a JSON text frame.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// AGENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent to the server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a game as a player.
    JoinGame {
        /// Join parameters.
        data: JoinRequest,
    },

    /// One control action for the living player.
    Control {
        /// Single-letter action encoding.
        data: Action,
    },

    /// Ghost movement target, sent while dead.
    ControlGhost {
        /// Destination cell.
        data: GridPos,
    },
}

impl ClientMessage {
    /// Serialize to a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Join parameters. The server expects camelCase keys here, unlike the
/// abbreviated state payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Game instance to join.
    pub game_id: String,
    /// This agent's player id.
    pub player_id: String,
    /// Participation role; always `"player"` for this agent.
    pub role: String,
    /// Display name.
    pub player_name: String,
    /// Team identifier.
    pub team_id: String,
    /// Team display name.
    pub team_name: String,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Direction;

    #[test]
    fn test_decodes_initial_state() {
        let json = r#"{
            "type": "initial_state",
            "map": { "width": 2, "height": 1, "tiles": [[0, 1]] },
            "players": [{ "id": "p1", "p": { "x": 150, "y": 250 }, "bl": 1 }],
            "bombs": [],
            "items": []
        }"#;

        match ServerMessage::from_json(json).unwrap() {
            ServerMessage::InitialState(snapshot) => {
                assert_eq!(snapshot.players.len(), 1);
                assert_eq!(snapshot.players[0].id, "p1");
                assert_eq!(snapshot.map.unwrap().width, 2);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_decodes_tick_delta_with_abbreviated_fields() {
        let json = r#"{
            "type": "tick_delta",
            "destroyedBricks": [{ "x": 4, "y": 2 }],
            "players": [{ "id": "p1", "p": { "x": 310, "y": 420 }, "bp": 1 }],
            "bombs": [{ "id": "b1", "o": "p1", "p": { "x": 3, "y": 4 }, "c": 29, "pow": 2 }]
        }"#;

        match ServerMessage::from_json(json).unwrap() {
            ServerMessage::TickDelta(delta) => {
                assert_eq!(delta.destroyed_bricks.len(), 1);
                assert_eq!(delta.players[0].bombs_placed, Some(1));
                assert_eq!(delta.bombs.as_ref().unwrap()[0].countdown_ticks, Some(29));
                assert!(delta.items.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_decodes_game_over_winner() {
        let msg = ServerMessage::from_json(r#"{ "type": "game_over", "winnerId": "p7" }"#);
        match msg.unwrap() {
            ServerMessage::GameOver { winner_id } => {
                assert_eq!(winner_id.as_deref(), Some("p7"));
            }
            other => panic!("wrong variant: {other:?}"),
        }

        // A draw carries no winner.
        let draw = ServerMessage::from_json(r#"{ "type": "game_over" }"#);
        assert!(matches!(
            draw.unwrap(),
            ServerMessage::GameOver { winner_id: None }
        ));
    }

    #[test]
    fn test_unknown_type_decodes_as_unknown() {
        let msg = ServerMessage::from_json(r#"{ "type": "spectator_count", "count": 3 }"#);
        assert!(matches!(msg.unwrap(), ServerMessage::Unknown));
    }

    #[test]
    fn test_bare_events_decode() {
        for (json, expect_tick) in [
            (r#"{ "type": "tick" }"#, true),
            (r#"{ "type": "bomb_placed" }"#, false),
            (r#"{ "type": "bomb_exploding_soon" }"#, false),
            (r#"{ "type": "player_died" }"#, false),
        ] {
            let msg = ServerMessage::from_json(json).unwrap();
            if expect_tick {
                assert!(matches!(msg, ServerMessage::Tick));
            } else {
                assert!(!matches!(msg, ServerMessage::Unknown));
            }
        }
    }

    #[test]
    fn test_control_encoding_is_exact() {
        let msg = ClientMessage::Control {
            data: Action::PlaceBomb,
        };
        assert_eq!(msg.to_json().unwrap(), r#"{"type":"control","data":"b"}"#);

        let msg = ClientMessage::Control {
            data: Action::Move(Direction::Left),
        };
        assert_eq!(msg.to_json().unwrap(), r#"{"type":"control","data":"l"}"#);
    }

    #[test]
    fn test_ghost_control_encoding() {
        let msg = ClientMessage::ControlGhost {
            data: GridPos::new(5, 7),
        };
        assert_eq!(
            msg.to_json().unwrap(),
            r#"{"type":"control_ghost","data":{"x":5,"y":7}}"#
        );
    }

    #[test]
    fn test_join_game_uses_camel_case() {
        let msg = ClientMessage::JoinGame {
            data: JoinRequest {
                game_id: "g1".to_string(),
                player_id: "p1".to_string(),
                role: "player".to_string(),
                player_name: "Rusty".to_string(),
                team_id: "t1".to_string(),
                team_name: "Crate Expectations".to_string(),
            },
        };

        let json = msg.to_json().unwrap();
        assert!(json.starts_with(r#"{"type":"join_game","data":{"#));
        assert!(json.contains(r#""gameId":"g1""#));
        assert!(json.contains(r#""playerId":"p1""#));
        assert!(json.contains(r#""role":"player""#));
        assert!(json.contains(r#""playerName":"Rusty""#));
        assert!(json.contains(r#""teamId":"t1""#));
        assert!(json.contains(r#""teamName":"Crate Expectations""#));
    }
}

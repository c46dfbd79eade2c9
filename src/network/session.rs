//! Bot Session
//!
//! Ties the world model and the action policy to the message stream: one
//! inbound server message in, at most one outbound message back.
//!
//! The session owns no I/O. The transport (`network::client`) feeds it
//! decoded messages and sends whatever it returns, which keeps the whole
//! decision path synchronous and directly testable.

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::grid::GridPos;
use crate::game::policy::ActionPolicy;
use crate::game::world::{PlayerStatus, WorldModel};
use crate::network::protocol::{ClientMessage, JoinRequest, ServerMessage};

/// Fixed cell dead players rally toward as ghosts.
pub const GHOST_RALLY: GridPos = GridPos::new(5, 7);

/// Connection and identity parameters for one bot session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket URL of the game server.
    pub server_url: String,
    /// Game instance to join.
    pub game_id: String,
    /// This agent's player id.
    pub player_id: String,
    /// Display name.
    pub player_name: String,
    /// Team identifier.
    pub team_id: String,
    /// Team display name.
    pub team_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:3001".to_string(),
            game_id: "default".to_string(),
            player_id: Uuid::new_v4().to_string(),
            player_name: "rustbot".to_string(),
            team_id: "rust".to_string(),
            team_name: "Rust Squad".to_string(),
        }
    }
}

impl SessionConfig {
    /// Build a config from `BOMBER_*` environment variables, falling back
    /// to defaults for any that are unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_url: std::env::var("BOMBER_SERVER_URL").unwrap_or(defaults.server_url),
            game_id: std::env::var("BOMBER_GAME_ID").unwrap_or(defaults.game_id),
            player_id: std::env::var("BOMBER_PLAYER_ID").unwrap_or(defaults.player_id),
            player_name: std::env::var("BOMBER_PLAYER_NAME").unwrap_or(defaults.player_name),
            team_id: std::env::var("BOMBER_TEAM_ID").unwrap_or(defaults.team_id),
            team_name: std::env::var("BOMBER_TEAM_NAME").unwrap_or(defaults.team_name),
        }
    }
}

/// One bot's view of one match: configuration, world model, and policy.
pub struct BotSession {
    config: SessionConfig,
    world: WorldModel,
    policy: ActionPolicy,
}

impl BotSession {
    /// Create a session for the given connection parameters.
    pub fn new(config: SessionConfig) -> Self {
        let policy = ActionPolicy::new(config.player_id.clone());
        Self {
            config,
            world: WorldModel::new(),
            policy,
        }
    }

    /// The join message to send once the connection is established.
    pub fn join_message(&self) -> ClientMessage {
        ClientMessage::JoinGame {
            data: JoinRequest {
                game_id: self.config.game_id.clone(),
                player_id: self.config.player_id.clone(),
                role: "player".to_string(),
                player_name: self.config.player_name.clone(),
                team_id: self.config.team_id.clone(),
                team_name: self.config.team_name.clone(),
            },
        }
    }

    /// Process one inbound message; returns the reply to send, if any.
    ///
    /// State messages update the world model and then act. Bare event
    /// messages re-run the decision against the unchanged world, so the
    /// agent reacts between deltas too.
    pub fn handle_message(&mut self, message: &ServerMessage) -> Option<ClientMessage> {
        match message {
            ServerMessage::InitialState(snapshot) => {
                self.world.apply_snapshot(snapshot);
                self.act()
            }
            ServerMessage::TickDelta(delta) => {
                self.world.apply_delta(delta);
                self.act()
            }
            ServerMessage::Tick
            | ServerMessage::BombPlaced
            | ServerMessage::BombExplodingSoon
            | ServerMessage::PlayerDied => self.act(),
            ServerMessage::JoinSuccess => {
                info!(player_id = %self.config.player_id, "joined game");
                None
            }
            ServerMessage::GameOver { winner_id } => {
                info!(winner = winner_id.as_deref().unwrap_or("draw"), "game over");
                None
            }
            ServerMessage::Unknown => None,
        }
    }

    /// Decide one action for the current world state.
    fn act(&mut self) -> Option<ClientMessage> {
        let Some(me) = self.world.player(&self.config.player_id) else {
            warn!(player_id = %self.config.player_id, "not in roster yet");
            return None;
        };

        if me.status == PlayerStatus::Dead {
            return Some(ClientMessage::ControlGhost { data: GHOST_RALLY });
        }

        match self.policy.decide(&self.world) {
            Ok(action) => Some(ClientMessage::Control { data: action }),
            Err(err) => {
                warn!(%err, "skipping tick");
                None
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::policy::Action;
    use serde_json::json;

    fn config() -> SessionConfig {
        SessionConfig {
            player_id: "me".to_string(),
            ..SessionConfig::default()
        }
    }

    fn initial_state(players: serde_json::Value) -> ServerMessage {
        ServerMessage::from_json(
            &json!({
                "type": "initial_state",
                "map": {
                    "width": 5,
                    "height": 5,
                    "tiles": [
                        [1, 1, 1, 1, 1],
                        [1, 0, 0, 0, 1],
                        [1, 0, 0, 2, 1],
                        [1, 0, 0, 0, 1],
                        [1, 1, 1, 1, 1]
                    ]
                },
                "players": players
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state_yields_control() {
        let mut session = BotSession::new(config());
        let msg = initial_state(json!([
            { "id": "me", "p": { "x": 200, "y": 200 }, "bl": 1, "tid": "a" }
        ]));

        let reply = session.handle_message(&msg);
        assert!(matches!(reply, Some(ClientMessage::Control { .. })));
    }

    #[test]
    fn test_dead_player_sends_ghost_rally() {
        let mut session = BotSession::new(config());
        let msg = initial_state(json!([
            { "id": "me", "p": { "x": 200, "y": 200 }, "s": "dead", "tid": "a" }
        ]));

        match session.handle_message(&msg) {
            Some(ClientMessage::ControlGhost { data }) => {
                assert_eq!(data, GridPos::new(5, 7));
            }
            other => panic!("expected ghost control, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_player_yields_nothing() {
        let mut session = BotSession::new(config());
        let msg = initial_state(json!([
            { "id": "someone-else", "p": { "x": 200, "y": 200 } }
        ]));

        assert!(session.handle_message(&msg).is_none());
    }

    #[test]
    fn test_bare_event_re_decides_without_state() {
        let mut session = BotSession::new(config());
        session.handle_message(&initial_state(json!([
            { "id": "me", "p": { "x": 200, "y": 200 }, "bl": 1, "tid": "a" }
        ])));

        // A bare tick re-runs the decision against the unchanged world.
        let reply = session.handle_message(&ServerMessage::Tick);
        assert!(matches!(reply, Some(ClientMessage::Control { .. })));
    }

    #[test]
    fn test_event_before_any_state_is_safe() {
        let mut session = BotSession::new(config());
        assert!(session.handle_message(&ServerMessage::BombPlaced).is_none());
    }

    #[test]
    fn test_join_and_unknown_yield_nothing() {
        let mut session = BotSession::new(config());
        assert!(session.handle_message(&ServerMessage::JoinSuccess).is_none());
        assert!(session.handle_message(&ServerMessage::Unknown).is_none());
        assert!(session
            .handle_message(&ServerMessage::GameOver { winner_id: None })
            .is_none());
    }

    #[test]
    fn test_join_message_carries_identity() {
        let session = BotSession::new(SessionConfig {
            game_id: "g9".to_string(),
            player_id: "me".to_string(),
            ..SessionConfig::default()
        });

        match session.join_message() {
            ClientMessage::JoinGame { data } => {
                assert_eq!(data.game_id, "g9");
                assert_eq!(data.player_id, "me");
                assert_eq!(data.role, "player");
            }
            other => panic!("expected join, got {other:?}"),
        }
    }

    #[test]
    fn test_scenario_brick_next_door_bombs() {
        // Agent at (2,2) with a brick at (3,2): the first decision after
        // the snapshot is a bomb placement.
        let mut session = BotSession::new(config());
        let reply = session.handle_message(&initial_state(json!([
            { "id": "me", "p": { "x": 200, "y": 200 }, "bl": 1, "bp": 0, "tid": "a" }
        ])));

        match reply {
            Some(ClientMessage::Control { data }) => assert_eq!(data, Action::PlaceBomb),
            other => panic!("expected control, got {other:?}"),
        }
    }
}
